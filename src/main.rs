use iplocator::{config, runtime, system};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    config::init_config();

    // guard 必须存活到进程结束，保证非阻塞日志落盘
    let _guard = system::logging::init_logging(&config::get_config());

    runtime::server::run_server().await
}
