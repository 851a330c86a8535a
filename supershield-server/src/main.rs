use supershield_common::email::senders::LettreConnector;
use supershield_common::email::Connector;

use actix_web::web::Data;
use actix_web::{App, HttpServer};
use flexi_logger::{
    Age, Cleanup, Criterion, Duplicate, FileSpec, LogSpecification, Logger, Naming, WriteMode,
};
use std::sync::Arc;

mod env;
mod handlers;
mod services;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let mut port = 3000u16;
    let mut host = String::from("127.0.0.1");

    let mut args = std::env::args();

    // Eat the first argument, which is the relative path to the executable
    args.next();

    while let Some(arg) = args.next() {
        match arg.to_lowercase().as_str() {
            "--port" => {
                let port_str = {
                    let next_arg = args.next();

                    match next_arg {
                        Some(s) => s,
                        None => {
                            eprintln!("ERROR: --port option specified but no port was given");
                            std::process::exit(1);
                        }
                    }
                };

                port = {
                    let port_result = port_str.parse::<u16>();

                    match port_result {
                        Ok(p) => p,
                        Err(_) => {
                            eprintln!("ERROR: Incorrect format for port. Integer expected");
                            std::process::exit(1);
                        }
                    }
                };

                continue;
            }
            "--host" => {
                host = match args.next() {
                    Some(h) => h,
                    None => {
                        eprintln!("ERROR: --host option specified but no host was given");
                        std::process::exit(1);
                    }
                };

                continue;
            }
            a => {
                eprintln!("ERROR: Invalid argument: {}", &a);
                std::process::exit(1);
            }
        }
    }

    let config = env::Config::from_env();

    let log_spec = match LogSpecification::parse(&config.log_level) {
        Ok(s) => s,
        Err(_) => {
            eprintln!("ERROR: Invalid LOG_LEVEL '{}'", config.log_level);
            std::process::exit(1);
        }
    };

    let _logger = Logger::with(log_spec)
        .log_to_file(FileSpec::default().directory("./logs"))
        .rotate(
            Criterion::Age(Age::Day),
            Naming::Timestamps,
            Cleanup::KeepLogAndCompressedFiles(30, 180),
        )
        .cleanup_in_background_thread(true)
        .duplicate_to_stdout(Duplicate::All)
        .write_mode(WriteMode::Async)
        .format(|writer, now, record| {
            write!(
                writer,
                "{:5} | {} | {}:{} | {}",
                record.level(),
                now.format("%Y-%m-%dT%H:%M:%S%.6fZ"),
                record.module_path().unwrap_or("<unknown>"),
                record.line().unwrap_or(0),
                record.args()
            )
        })
        .use_utc()
        .start()
        .expect("Failed to start logger");

    let snapshot = config.snapshot();
    if snapshot.is_complete() {
        log::info!("Mail configuration complete");
    } else {
        log::warn!(
            "Mail configuration incomplete, enquiries will be rejected. Missing: {}",
            snapshot.missing.join(", "),
        );
    }

    if config.admin_uses_default_credentials {
        log::warn!(
            "ADMIN_USER/ADMIN_PASS are not both set. The admin page is protected by the \
             built-in default credentials, which are publicly known"
        );
    }

    let actix_workers = config.actix_worker_count;
    let connector: Connector = Arc::new(LettreConnector::new(config.smtp_timeout));
    let config = Data::new(config);

    let base_addr = format!("{}:{}", &host, &port);
    log::info!("Listening on {base_addr}");

    HttpServer::new(move || {
        App::new()
            .app_data(config.clone())
            .app_data(Data::new(connector.clone()))
            .configure(services::api::configure)
            .wrap(actix_web::middleware::Logger::default())
    })
    .workers(actix_workers)
    .bind(base_addr)?
    .run()
    .await?;

    Ok(())
}
