use std::{net::SocketAddr, sync::Arc};

use clap::Parser;
use dotenv::dotenv;
use fridgechef_api::{
    application::{
        cli::CliProcessor,
        http::server::http_server::{router, state},
    },
    args::{Args, LogArgs, Mode},
};
use fridgechef_core::{application::create_service, domain::common::FridgeChefConfig};
use tracing_subscriber::EnvFilter;

fn init_logger(log: &LogArgs) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&log.filter));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if log.json {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    dotenv().ok();

    let args = Arc::new(Args::parse());
    init_logger(&args.log);

    match args.mode {
        Mode::Cli => {
            let config = FridgeChefConfig::from(args.as_ref().clone());
            let service = create_service(config).await?;
            CliProcessor::new(service, args.storage.input_dir.clone())
                .run(&args)
                .await
        }
        Mode::Api => {
            let addr: SocketAddr = format!("{}:{}", args.server.host, args.server.port).parse()?;
            let router = router(state(args.clone()).await?)?;

            tracing::info!("listening on {}", addr);
            axum_server::bind(addr)
                .serve(router.into_make_service())
                .await?;

            Ok(())
        }
    }
}
