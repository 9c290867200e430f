use mhike::config::AppPaths;
use mhike::AppState;

fn main() {
    env_logger::init();

    let paths = AppPaths::discover().expect("Failed to discover app paths");
    let state = AppState::init(paths).expect("Failed to initialize database");

    let details = state
        .store
        .all_details()
        .expect("Failed to read hikes");
    log::info!("Loaded {} hikes", details.len());

    let json = serde_json::to_string_pretty(&details).expect("Failed to serialize hikes");
    println!("{json}");
}
