mod availability;
mod display;
mod error;
mod parser;
mod web;

use display::{print_roster, print_week_overview, write_week_to_file};
use parser::{load_roster, service_from_entries};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    // Check if we should run in web mode
    let args: Vec<String> = std::env::args().collect();
    if args.len() > 1 && args[1] == "web" {
        let port = args.get(2)
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(8080);
        let password = std::env::var("ADMIN_PASSWORD")
            .unwrap_or_else(|_| "admin123".to_string()); // Default password, change this!

        println!("Starting web server on port {}...", port);
        println!("Access the API at http://localhost:{}", port);

        web::start_server(port, password).await?;
        return Ok(());
    }

    // CLI mode: load a roster CSV and report the group's common availability
    let csv_path = args
        .get(1)
        .cloned()
        .unwrap_or_else(|| "data/roster.csv".to_string());

    println!("Loading roster from {}...", csv_path);
    let entries = load_roster(&csv_path)?;
    println!("Loaded {} users (resubmissions merged)", entries.len());
    print_roster(&entries);

    let (service, problems) = service_from_entries(&entries);
    for problem in &problems {
        eprintln!("warning: skipped {}", problem);
    }

    print_week_overview(&service);

    let output_path = "common_availability.txt";
    write_week_to_file(&service, output_path)?;
    println!("\nCommon availability saved to {}", output_path);

    Ok(())
}
