use log::error;

use se_monitor::prelude::*;

#[tokio::main]
async fn main() {
    if let Err(err) = se_monitor::app(Options::new()).await {
        // config errors arrive before app() has set up logging
        se_monitor::init_logger("error");
        error!("{:#}", err);
        std::process::exit(1);
    }
}
