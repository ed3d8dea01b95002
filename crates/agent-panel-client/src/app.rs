use std::rc::Rc;

use agent_panel_core::config::ConsoleConfig;
use agent_panel_core::state::AgentState;

use crate::api::ControlApi;
use crate::connection::ConnectionManager;
use crate::dispatch::CommandDispatcher;
use crate::notify::{NotificationPresenter, NotificationSurface};
use crate::runtime;
use crate::sync::{StatusSurface, StatusSynchronizer};

/// Id of the inline `<script type="application/toml">` holding page config.
pub const CONFIG_ELEMENT_ID: &str = "agent-panel-config";

/// All panel components wired together for one page.
pub struct Console<A> {
    api: Rc<A>,
    sync: Rc<StatusSynchronizer>,
    notifier: Rc<NotificationPresenter>,
    dispatcher: Rc<CommandDispatcher<A>>,
    connection: ConnectionManager,
}

impl<A: ControlApi + 'static> Console<A> {
    pub fn new(
        config: &ConsoleConfig,
        api: A,
        status_surface: Rc<dyn StatusSurface>,
        notification_surface: Rc<dyn NotificationSurface>,
    ) -> Self {
        let api = Rc::new(api);
        let sync = Rc::new(StatusSynchronizer::new(status_surface));
        let notifier = Rc::new(NotificationPresenter::with_ttl(
            notification_surface,
            config.notifications.ttl(),
        ));
        let dispatcher = Rc::new(
            CommandDispatcher::new(Rc::clone(&api), Rc::clone(&sync), Rc::clone(&notifier))
                .with_default_interval(config.commands.default_interval_minutes),
        );
        Self {
            api,
            sync,
            notifier,
            dispatcher,
            connection: ConnectionManager::new(config),
        }
    }

    pub fn sync(&self) -> &Rc<StatusSynchronizer> {
        &self.sync
    }

    pub fn notifier(&self) -> &Rc<NotificationPresenter> {
        &self.notifier
    }

    pub fn dispatcher(&self) -> &Rc<CommandDispatcher<A>> {
        &self.dispatcher
    }

    pub fn connection(&self) -> &ConnectionManager {
        &self.connection
    }

    pub async fn check_status(&self) -> AgentState {
        self.sync.check_status(self.api.as_ref()).await
    }

    pub fn spawn_check_status(self: &Rc<Self>) {
        let console = Rc::clone(self);
        runtime::spawn_local(async move {
            console.check_status().await;
        });
    }

    /// Initial poll plus push subscription. A failed subscription is logged;
    /// the page keeps working from polls and command confirmations.
    pub fn boot(self: &Rc<Self>) {
        self.spawn_check_status();
        if let Err(e) = self.connection.connect(Rc::clone(&self.sync)) {
            tracing::warn!(error = %e, "Push channel unavailable");
        }
    }
}

/// Build the effective config from the page's TOML (if any) and origin.
/// Unusable config falls back to defaults.
pub fn resolve_config(source: Option<&str>, origin: Option<&str>) -> ConsoleConfig {
    let config = match source.map(str::trim).filter(|s| !s.is_empty()) {
        Some(source) => match ConsoleConfig::from_toml_str(source) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(error = %e, "Ignoring page config");
                ConsoleConfig::default()
            },
        },
        None => ConsoleConfig::default(),
    };
    let config = match (config.base_url.is_empty(), origin) {
        (true, Some(origin)) => config.with_base_url(origin),
        _ => config,
    };
    match config.validate() {
        Ok(()) => config,
        Err(e) => {
            tracing::warn!(error = %e, "Falling back to default config");
            let defaults = ConsoleConfig::default();
            match origin {
                Some(origin) => defaults.with_base_url(origin),
                None => defaults,
            }
        },
    }
}

/// Wire the panel into the current page.
#[cfg(target_family = "wasm")]
pub fn boot_page() {
    use crate::api::HttpControlApi;
    use crate::{bridge, dom};

    let Some(window) = web_sys::window() else {
        return;
    };
    let Some(document) = window.document() else {
        return;
    };

    let source = document
        .get_element_by_id(CONFIG_ELEMENT_ID)
        .and_then(|el| el.text_content());
    let origin = window.location().origin().ok();
    let config = resolve_config(source.as_deref(), origin.as_deref());

    let status_surface = Rc::new(dom::DomStatusSurface::new(document.clone()));
    let notification_surface = Rc::new(dom::DomNotificationSurface::new(document));
    let console = Rc::new(Console::new(
        &config,
        HttpControlApi::new(&config),
        status_surface,
        Rc::clone(&notification_surface) as Rc<dyn NotificationSurface>,
    ));

    let presenter = Rc::downgrade(console.notifier());
    notification_surface.set_dismiss_handler(move |id| {
        if let Some(presenter) = presenter.upgrade() {
            presenter.dismiss(id);
        }
    });

    bridge::attach(&console);
    console.boot();
}
