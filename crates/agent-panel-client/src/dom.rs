//! Page DOM surfaces for the status view and notifications.

use std::cell::RefCell;
use std::rc::Rc;

use agent_panel_core::notification::{Notification, NotificationId};
use agent_panel_core::view::StatusView;
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;

use crate::diag::console_warn;
use crate::notify::NotificationSurface;
use crate::sync::StatusSurface;

const ALERT_CONTAINER_ID: &str = "alert-container";
const ALERT_CONTAINER_STYLE: &str = "position: fixed; top: 20px; right: 20px; z-index: 9999;";

fn set_visible(el: &web_sys::Element, visible: bool) {
    let Some(el) = el.dyn_ref::<web_sys::HtmlElement>() else {
        return;
    };
    let style = el.style();
    let result = if visible {
        style.remove_property("display").map(|_| ())
    } else {
        style.set_property("display", "none")
    };
    if let Err(e) = result {
        console_warn!("Failed to toggle #{}: {e:?}", el.id());
    }
}

/// Dashboard status widget, present only on the dashboard page.
struct DashboardWidget {
    badge: web_sys::Element,
    start_btn: Option<web_sys::Element>,
    stop_btn: Option<web_sys::Element>,
    last_update: Option<web_sys::Element>,
}

pub struct DomStatusSurface {
    document: web_sys::Document,
}

impl DomStatusSurface {
    pub fn new(document: web_sys::Document) -> Self {
        Self { document }
    }

    fn by_id(&self, id: &str) -> Option<web_sys::Element> {
        self.document.get_element_by_id(id)
    }

    fn dashboard(&self) -> Option<DashboardWidget> {
        Some(DashboardWidget {
            badge: self.by_id("dashboard-agent-status")?,
            start_btn: self.by_id("dashboard-start-btn"),
            stop_btn: self.by_id("dashboard-stop-btn"),
            last_update: self.by_id("dashboard-last-update"),
        })
    }

    fn render_label(&self, el: &web_sys::Element, icon_class: &str, label: &str) {
        el.set_text_content(None);
        if let Ok(icon) = self.document.create_element("i") {
            icon.set_class_name(icon_class);
            let _ = el.append_child(&icon);
        }
        let _ = el.append_child(&self.document.create_text_node(label));
    }
}

impl StatusSurface for DomStatusSurface {
    fn render(&self, view: &StatusView) {
        let navbar = &view.navbar;
        if let Some(status) = self.by_id("agent-status") {
            self.render_label(&status, navbar.icon_class, navbar.label);
        }
        if let Some(btn) = self.by_id("start-agent-btn") {
            set_visible(&btn, navbar.start_visible);
        }
        if let Some(btn) = self.by_id("stop-agent-btn") {
            set_visible(&btn, navbar.stop_visible);
        }
        if let (Some(el), Some(text)) = (self.by_id("last-update"), &navbar.last_update_text) {
            el.set_text_content(Some(text));
        }

        let Some(widget) = self.dashboard() else {
            return;
        };
        let dash = &view.dashboard;
        let classes = widget.badge.class_list();
        let _ = classes.remove_1(dash.stale_badge_class);
        let _ = classes.add_1(dash.badge_class);
        widget.badge.set_text_content(Some(dash.badge_text));
        if let Some(btn) = &widget.start_btn {
            set_visible(btn, dash.start_visible);
        }
        if let Some(btn) = &widget.stop_btn {
            set_visible(btn, dash.stop_visible);
        }
        if let (Some(el), Some(text)) = (&widget.last_update, &dash.last_update_text) {
            el.set_text_content(Some(text));
        }
    }
}

type DismissHandler = Rc<dyn Fn(NotificationId)>;

/// Bootstrap alerts in a fixed container at the top right of the page.
pub struct DomNotificationSurface {
    document: web_sys::Document,
    on_dismiss: RefCell<Option<DismissHandler>>,
}

impl DomNotificationSurface {
    pub fn new(document: web_sys::Document) -> Self {
        Self {
            document,
            on_dismiss: RefCell::new(None),
        }
    }

    /// Called with the notification id when its close button is clicked.
    pub fn set_dismiss_handler(&self, handler: impl Fn(NotificationId) + 'static) {
        *self.on_dismiss.borrow_mut() = Some(Rc::new(handler));
    }

    fn node_id(id: NotificationId) -> String {
        format!("agent-alert-{id}")
    }

    fn build_alert(&self, notification: &Notification) -> Option<web_sys::Element> {
        let doc = &self.document;
        let alert = doc.create_element("div").ok()?;
        alert.set_id(&Self::node_id(notification.id));
        alert.set_class_name(&notification.level.alert_classes());
        let _ = alert.set_attribute("role", "alert");
        alert
            .append_child(&doc.create_text_node(&notification.text))
            .ok()?;

        let close = doc.create_element("button").ok()?;
        let _ = close.set_attribute("type", "button");
        let _ = close.set_attribute("aria-label", "Close");
        close.set_class_name("btn-close");
        if let Some(handler) = self.on_dismiss.borrow().as_ref() {
            let handler = Rc::clone(handler);
            let id = notification.id;
            let closure = Closure::<dyn FnMut()>::new(move || handler(id));
            let _ =
                close.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        alert.append_child(&close).ok()?;
        Some(alert)
    }
}

impl NotificationSurface for DomNotificationSurface {
    fn ensure_container(&self) {
        if self.document.get_element_by_id(ALERT_CONTAINER_ID).is_some() {
            return;
        }
        let Some(body) = self.document.body() else {
            console_warn!("No <body> to hold notifications");
            return;
        };
        let Ok(container) = self.document.create_element("div") else {
            return;
        };
        container.set_id(ALERT_CONTAINER_ID);
        let _ = container.set_attribute("style", ALERT_CONTAINER_STYLE);
        if let Err(e) = body.append_child(&container) {
            console_warn!("Failed to create notification container: {e:?}");
        }
    }

    fn append(&self, notification: &Notification) {
        let Some(container) = self.document.get_element_by_id(ALERT_CONTAINER_ID) else {
            return;
        };
        match self.build_alert(notification) {
            Some(alert) => {
                let _ = container.append_child(&alert);
            },
            None => console_warn!("Failed to build notification {}", notification.id),
        }
    }

    fn remove(&self, id: NotificationId) {
        if let Some(node) = self.document.get_element_by_id(&Self::node_id(id)) {
            node.remove();
        }
    }
}
