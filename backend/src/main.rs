use reservations_backend::{initialize_backend, logging, Config};
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init_tracing();

    let config = Config::from_env()?;
    info!("Using reservation API at {}", config.api_base_url);

    let state = initialize_backend(&config)?;

    let rooms = match state.catalog_service.rooms().await {
        Ok(rooms) => rooms,
        Err(e) => {
            error!("Error fetching rooms: {}", e);
            return Err(e.into());
        }
    };

    if rooms.is_empty() {
        println!("No rooms available");
        return Ok(());
    }

    for room in &rooms {
        println!("{} (capacity {})", room.location, room.capacity);
        if !room.description.is_empty() {
            println!("{}", room.description);
        }
        let view = state.schedule_service.room_availability(room);
        println!("{}", state.schedule_service.render_text(&view));
    }

    Ok(())
}
