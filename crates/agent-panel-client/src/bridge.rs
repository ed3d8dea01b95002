//! Button handlers and window functions so page templates can drive the panel.

use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;

use crate::api::ControlApi;
use crate::app::Console;
use crate::diag::console_warn;

const START_BUTTONS: [&str; 2] = ["start-agent-btn", "dashboard-start-btn"];
const STOP_BUTTONS: [&str; 2] = ["stop-agent-btn", "dashboard-stop-btn"];

fn on_click(document: &web_sys::Document, id: &str, handler: impl FnMut() + 'static) {
    let Some(btn) = document.get_element_by_id(id) else {
        return;
    };
    let closure = Closure::<dyn FnMut()>::new(handler);
    if let Err(e) = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())
    {
        console_warn!("Failed to attach click handler to #{id}: {e:?}");
    }
    closure.forget();
}

fn expose(window: &web_sys::Window, name: &str, function: &js_sys::Function) {
    if js_sys::Reflect::set(window, &name.into(), function).is_err() {
        console_warn!("Failed to expose window.{name}");
    }
}

pub fn attach<A: ControlApi + 'static>(console: &Rc<Console<A>>) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let Some(document) = window.document() else {
        return;
    };

    for id in START_BUTTONS {
        let dispatcher = Rc::clone(console.dispatcher());
        on_click(&document, id, move || dispatcher.spawn_start(None));
    }
    for id in STOP_BUTTONS {
        let dispatcher = Rc::clone(console.dispatcher());
        on_click(&document, id, move || dispatcher.spawn_stop());
    }

    // startAgent(interval?)
    {
        let dispatcher = Rc::clone(console.dispatcher());
        let closure = Closure::<dyn FnMut(Option<u32>)>::new(move |interval: Option<u32>| {
            dispatcher.spawn_start(interval);
        });
        expose(&window, "startAgent", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    // stopAgent()
    {
        let dispatcher = Rc::clone(console.dispatcher());
        let closure = Closure::<dyn FnMut()>::new(move || dispatcher.spawn_stop());
        expose(&window, "stopAgent", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    // checkAgentStatus()
    {
        let console = Rc::clone(console);
        let closure = Closure::<dyn FnMut()>::new(move || console.spawn_check_status());
        expose(&window, "checkAgentStatus", closure.as_ref().unchecked_ref());
        closure.forget();
    }
}
