//! Prints the dashboard of the current user
//!
//! The backend URL can be set with `PLANNER_URL`. Set `PLANNER_USERNAME` and `PLANNER_PASSWORD` to log in first.

use std::error::Error;

use study_planner::client::Client;
use study_planner::config::BACKEND_URL;
use study_planner::dashboard::Dashboard;
use study_planner::utils::print_dashboard;
use study_planner::{Command, Store};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    if let Ok(url) = std::env::var("PLANNER_URL") {
        if let Ok(mut backend_url) = BACKEND_URL.lock() {
            *backend_url = url;
        }
    }

    let client = Client::from_default_url()?;
    if let (Ok(username), Ok(password)) = (std::env::var("PLANNER_USERNAME"), std::env::var("PLANNER_PASSWORD")) {
        client.login(&username, &password).await?;
    }

    let mut store = Store::new(client);
    let state = store.dispatch(Command::Reload).await;
    if let Some(err) = state.last_error() {
        log::error!("Unable to load tasks: {}", err);
    }
    let dashboard = Dashboard::build(store.state(), store.today());
    print_dashboard(&dashboard);

    match store.source().get_keypoints().await {
        Err(err) => log::warn!("Unable to load key points: {}", err),
        Ok(keypoints) => {
            println!("KEY POINTS");
            for keypoint in keypoints {
                println!("    {}", keypoint.content());
            }
        },
    }

    Ok(())
}
