use actix_web::{middleware, web, App, HttpRequest, HttpResponse, HttpServer, Result};
use serde::{Deserialize, Serialize};
use std::sync::Mutex;

use crate::availability::{
    AvailabilityService, DayAvailability, DayOfWeek, UserProfile,
};
use crate::error::AvailabilityError;
use crate::parser::{load_roster, service_from_entries};

/// Shared application state. The single mutex makes every
/// "read store, sweep, publish cache" sequence one critical section.
pub struct AppState {
    pub service: Mutex<AvailabilityService>,
    pub admin_password: String,
}

#[derive(Deserialize)]
pub struct RegisterRequest {
    user_id: String,
    preferred_name: String,
    email: String,
    phone_number: String,
    degree_major: String,
}

#[derive(Deserialize)]
pub struct SetAvailabilityRequest {
    user_id: String,
    day: String,
    start_time: String,
    end_time: String,
}

#[derive(Serialize)]
pub struct SlotResponse {
    start: String,
    end: String,
}

#[derive(Serialize)]
pub struct DaySlotsResponse {
    day: String,
    slots: Vec<SlotResponse>,
}

fn error_response(err: &AvailabilityError) -> HttpResponse {
    let body = serde_json::json!({"success": false, "error": err.to_string()});
    match err {
        AvailabilityError::UnknownUser(_) => HttpResponse::NotFound().json(body),
        _ => HttpResponse::BadRequest().json(body),
    }
}

fn slot_responses(slots: Vec<(String, String)>) -> Vec<SlotResponse> {
    slots
        .into_iter()
        .map(|(start, end)| SlotResponse { start, end })
        .collect()
}

// Register a user (or update their contact info)
async fn register(
    req: web::Json<RegisterRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let profile = UserProfile {
        preferred_name: req.preferred_name.clone(),
        email: req.email.clone(),
        phone_number: req.phone_number.clone(),
        degree_major: req.degree_major.clone(),
    };

    let mut service = state.service.lock().unwrap();
    service.register(&req.user_id, profile);

    Ok(HttpResponse::Ok().json(serde_json::json!({"success": true})))
}

// Set a user's availability for one day (HH:MM or N/A literals)
async fn set_availability(
    req: web::Json<SetAvailabilityRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let day = match DayOfWeek::parse(&req.day) {
        Some(day) => day,
        None => {
            return Ok(HttpResponse::BadRequest().json(serde_json::json!({
                "success": false,
                "error": format!("invalid day: {}", req.day)
            })))
        }
    };

    let mut service = state.service.lock().unwrap();
    match service.set_availability(&req.user_id, day, &req.start_time, &req.end_time) {
        Ok(()) => Ok(HttpResponse::Ok().json(serde_json::json!({"success": true}))),
        Err(err) => Ok(error_response(&err)),
    }
}

// Common availability for one day
async fn get_common_day(
    day: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let day_name = day.into_inner();
    let day = match DayOfWeek::parse(&day_name) {
        Some(day) => day,
        None => {
            return Ok(HttpResponse::BadRequest().json(serde_json::json!({
                "success": false,
                "error": format!("invalid day: {}", day_name)
            })))
        }
    };

    let service = state.service.lock().unwrap();
    Ok(HttpResponse::Ok().json(DaySlotsResponse {
        day: day.name().to_string(),
        slots: slot_responses(service.common_availability(day)),
    }))
}

// Common availability for the whole week, in week order
async fn get_common_week(state: web::Data<AppState>) -> Result<HttpResponse> {
    let service = state.service.lock().unwrap();
    let week: Vec<DaySlotsResponse> = service
        .all_common_availability()
        .into_iter()
        .map(|(day, slots)| DaySlotsResponse {
            day: day.name().to_string(),
            slots: slot_responses(slots),
        })
        .collect();
    Ok(HttpResponse::Ok().json(week))
}

// A user's registered info and weekly availability
async fn get_user(
    user_id: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let user_id = user_id.into_inner();
    let service = state.service.lock().unwrap();

    let profile = match service.profile(&user_id) {
        Some(profile) => profile.clone(),
        None => return Ok(error_response(&AvailabilityError::UnknownUser(user_id))),
    };
    let week = service.week(&user_id).map_err(actix_web::error::ErrorInternalServerError)?;

    let availability: Vec<serde_json::Value> = week
        .into_iter()
        .map(|(day, entry)| match entry {
            DayAvailability::Unavailable => serde_json::json!({
                "day": day.name(),
                "available": false,
            }),
            DayAvailability::Available { start, end } => serde_json::json!({
                "day": day.name(),
                "available": true,
                "start": crate::availability::format_minutes(start),
                "end": crate::availability::format_minutes(end),
            }),
        })
        .collect();

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "user_id": user_id,
        "profile": profile,
        "availability": availability,
    })))
}

// Admin: remove a user entirely
async fn remove_user(
    user_id: web::Path<String>,
    req: HttpRequest,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    if !admin_authorized(&req, &state) {
        return Ok(HttpResponse::Unauthorized()
            .json(serde_json::json!({"success": false, "error": "Unauthorized"})));
    }

    let mut service = state.service.lock().unwrap();
    match service.remove_user(&user_id) {
        Ok(()) => Ok(HttpResponse::Ok().json(serde_json::json!({"success": true}))),
        Err(err) => Ok(error_response(&err)),
    }
}

// Admin: replace all state from an uploaded roster CSV
async fn admin_upload(
    req: HttpRequest,
    body: web::Bytes,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    if !admin_authorized(&req, &state) {
        return Ok(HttpResponse::Unauthorized()
            .json(serde_json::json!({"success": false, "error": "Unauthorized"})));
    }

    let csv_path = "uploaded_roster.csv";
    std::fs::write(csv_path, &body)
        .map_err(|e| actix_web::error::ErrorInternalServerError(format!("Failed to save file: {}", e)))?;

    match load_roster(csv_path) {
        Ok(entries) => {
            let (service, problems) = service_from_entries(&entries);
            let user_count = service.total_user_count();
            *state.service.lock().unwrap() = service;

            Ok(HttpResponse::Ok().json(serde_json::json!({
                "success": true,
                "users": user_count,
                "problems": problems,
            })))
        }
        Err(e) => Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "success": false,
            "error": format!("Failed to process CSV: {}", e)
        }))),
    }
}

fn admin_authorized(req: &HttpRequest, state: &AppState) -> bool {
    let password = req
        .headers()
        .get("X-Admin-Password")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");
    password == state.admin_password
}

/// Route table, shared by the server and the tests.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/api/register", web::post().to(register))
        .route("/api/availability", web::post().to(set_availability))
        .route("/api/common", web::get().to(get_common_week))
        .service(web::resource("/api/common/{day}").route(web::get().to(get_common_day)))
        .service(
            web::resource("/api/users/{user_id}")
                .route(web::get().to(get_user))
                .route(web::delete().to(remove_user)),
        )
        .route("/api/upload", web::post().to(admin_upload));
}

pub async fn start_server(port: u16, admin_password: String) -> std::io::Result<()> {
    let app_state = web::Data::new(AppState {
        service: Mutex::new(AvailabilityService::new()),
        admin_password,
    });

    HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .wrap(middleware::Logger::default())
            .configure(configure_routes)
    })
    .bind(("0.0.0.0", port))?
    .run()
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test;

    fn test_state() -> web::Data<AppState> {
        web::Data::new(AppState {
            service: Mutex::new(AvailabilityService::new()),
            admin_password: "secret".to_string(),
        })
    }

    fn register_request(user_id: &str) -> actix_web::test::TestRequest {
        test::TestRequest::post()
            .uri("/api/register")
            .set_json(serde_json::json!({
                "user_id": user_id,
                "preferred_name": format!("user-{}", user_id),
                "email": "user@example.edu",
                "phone_number": "555-0100",
                "degree_major": "CS",
            }))
    }

    #[actix_web::test]
    async fn register_set_and_query_flow() {
        let app = test::init_service(
            App::new().app_data(test_state()).configure(configure_routes),
        )
        .await;

        for user in ["1", "2"] {
            let resp = test::call_service(&app, register_request(user).to_request()).await;
            assert!(resp.status().is_success());
        }

        for (user, start, end) in [("1", "09:00", "11:00"), ("2", "10:00", "12:00")] {
            let req = test::TestRequest::post()
                .uri("/api/availability")
                .set_json(serde_json::json!({
                    "user_id": user,
                    "day": "monday",
                    "start_time": start,
                    "end_time": end,
                }))
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert!(resp.status().is_success());
        }

        let req = test::TestRequest::get().uri("/api/common/Monday").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["day"], "Monday");
        assert_eq!(body["slots"][0]["start"], "10:00");
        assert_eq!(body["slots"][0]["end"], "11:00");
    }

    #[actix_web::test]
    async fn invalid_literal_is_rejected_with_400() {
        let app = test::init_service(
            App::new().app_data(test_state()).configure(configure_routes),
        )
        .await;

        let resp = test::call_service(&app, register_request("1").to_request()).await;
        assert!(resp.status().is_success());

        let req = test::TestRequest::post()
            .uri("/api/availability")
            .set_json(serde_json::json!({
                "user_id": "1",
                "day": "Monday",
                "start_time": "09:00",
                "end_time": "N/A",
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), actix_web::http::StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn unknown_user_is_404_and_remove_needs_password() {
        let app = test::init_service(
            App::new().app_data(test_state()).configure(configure_routes),
        )
        .await;

        let req = test::TestRequest::get().uri("/api/users/404").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), actix_web::http::StatusCode::NOT_FOUND);

        let resp = test::call_service(&app, register_request("1").to_request()).await;
        assert!(resp.status().is_success());
        let req = test::TestRequest::delete().uri("/api/users/1").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), actix_web::http::StatusCode::UNAUTHORIZED);

        let req = test::TestRequest::delete()
            .uri("/api/users/1")
            .insert_header(("X-Admin-Password", "secret"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_success());
    }
}
