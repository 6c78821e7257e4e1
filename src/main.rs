use fiapnet_web::animation::TICK_INTERVAL;
use fiapnet_web::collaborators::CollaboratorRegistry;
use fiapnet_web::http::{ReqwestTransport, Transport};
use fiapnet_web::page::STATS_SECTION_SELECTOR;
use fiapnet_web::stats::DISPLAY_FIELDS;
use fiapnet_web::widgets::LoggingWidgets;
use fiapnet_web::{render_page, Config, Event, PageController};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let config = Config::from_env()?;
    let transport = ReqwestTransport::new(&config.base_url)?;
    info!(base_url = %config.base_url, page = %config.page_path, "loading page");

    let mut widgets = LoggingWidgets::default();
    let mut controller = PageController::init(
        render_page(&config.page_path),
        &config.page_path,
        transport,
        &mut widgets,
        CollaboratorRegistry::new(),
    );
    controller.connect();
    controller.load_stats().await;

    if let Some(section) = controller.document().query_selector(STATS_SECTION_SELECTOR) {
        controller.handle_event(Event::Intersection {
            target: section,
            visible: true,
        });
    }
    let mut frames = tokio::time::interval(TICK_INTERVAL);
    frames.tick().await;
    while controller.is_animating() {
        frames.tick().await;
        controller.advance(TICK_INTERVAL);
    }
    log_counters(&controller);

    let Some(interval) = config.stats_interval else {
        return Ok(());
    };
    let mut polls = tokio::time::interval(interval);
    polls.tick().await;
    loop {
        tokio::select! {
            _ = polls.tick() => {
                if controller.load_stats().await.is_some() {
                    log_counters(&controller);
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("shutting down");
                break;
            }
        }
    }

    Ok(())
}

fn log_counters<T: Transport>(controller: &PageController<T>) {
    let document = controller.document();
    for (id, _) in DISPLAY_FIELDS {
        if let Some(node) = document.get_element_by_id(id) {
            info!(counter = id, value = %document.text_content(node), "stats");
        }
    }
}
