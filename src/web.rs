//! Browser side: `web_sys` implementations of the host traits and the
//! listener wiring that feeds events into each component.

use std::cell::RefCell;
use std::rc::Rc;

use gloo_timers::callback::Timeout;
use js_sys::{Array, Reflect};
use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys::{
    window, AddEventListenerOptions, Document, Element, Event, EventTarget, HtmlDocument,
    HtmlElement, HtmlTextAreaElement, IntersectionObserver, IntersectionObserverEntry,
    IntersectionObserverInit, MediaQueryList, MediaQueryListEvent, NodeList, ScrollBehavior,
    ScrollToOptions, Window,
};

use crate::active_section::ActiveSection;
use crate::config::{SiteConfig, CONFIG_ELEMENT_ID};
use crate::copy::CopyButtons;
use crate::dom::{Clipboard, Intersection, Node, Observer, Storage, Timers, Viewport};
use crate::error::{Result, SiteError};
use crate::lazy_iframe::LazyIframe;
use crate::mobile_nav::MobileNav;
use crate::nav_scroll::NavScroll;
use crate::reveal::ScrollAnimations;
use crate::smooth_scroll::SmoothScroll;
use crate::theme::ThemeManager;

thread_local! {
    static ATTACHED: RefCell<Vec<Subscription>> = const { RefCell::new(Vec::new()) };
}

fn js_error(context: &'static str, value: &JsValue) -> SiteError {
    let message = value
        .as_string()
        .or_else(|| {
            value
                .dyn_ref::<js_sys::Error>()
                .map(|err| String::from(err.message()))
        })
        .unwrap_or_else(|| format!("{value:?}"));
    SiteError::js(context, message)
}

impl Node for Element {
    fn has_class(&self, class: &str) -> bool {
        self.class_list().contains(class)
    }

    fn add_class(&self, class: &str) {
        let _ = self.class_list().add_1(class);
    }

    fn remove_class(&self, class: &str) {
        let _ = self.class_list().remove_1(class);
    }

    fn toggle_class(&self, class: &str) -> bool {
        self.class_list().toggle(class).unwrap_or(false)
    }

    fn attribute(&self, name: &str) -> Option<String> {
        Element::get_attribute(self, name)
    }

    fn set_attribute(&self, name: &str, value: &str) {
        let _ = Element::set_attribute(self, name, value);
    }

    fn set_style(&self, property: &str, value: &str) {
        let Some(element) = self.dyn_ref::<HtmlElement>() else {
            return;
        };
        let style = element.style();
        if value.is_empty() {
            let _ = style.remove_property(property);
        } else {
            let _ = style.set_property(property, value);
        }
    }

    fn contains(&self, other: &Self) -> bool {
        let other: &web_sys::Node = other;
        web_sys::Node::contains(self, Some(other))
    }

    fn offset_top(&self) -> f64 {
        self.dyn_ref::<HtmlElement>()
            .map_or(0.0, |element| f64::from(element.offset_top()))
    }

    fn offset_height(&self) -> f64 {
        self.dyn_ref::<HtmlElement>()
            .map_or(0.0, |element| f64::from(element.offset_height()))
    }

    fn bounding_top(&self) -> f64 {
        self.get_bounding_client_rect().top()
    }
}

pub struct LocalStorage(Option<web_sys::Storage>);

impl LocalStorage {
    fn open(window: &Window) -> Self {
        Self(window.local_storage().ok().flatten())
    }
}

impl Storage for LocalStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.0.as_ref()?.get_item(key).ok().flatten()
    }

    fn set(&self, key: &str, value: &str) {
        if let Some(storage) = self.0.as_ref() {
            let _ = storage.set_item(key, value);
        }
    }
}

pub struct WindowViewport(Window);

impl Viewport for WindowViewport {
    fn scroll_y(&self) -> f64 {
        self.0.scroll_y().unwrap_or(0.0)
    }

    fn smooth_scroll_to(&self, top: f64) {
        let options = ScrollToOptions::new();
        options.set_top(top);
        options.set_behavior(ScrollBehavior::Smooth);
        self.0.scroll_to_with_scroll_to_options(&options);
    }
}

pub struct GlooTimers;

impl Timers for GlooTimers {
    type Handle = Timeout;

    fn schedule(&self, delay_ms: u32, callback: Box<dyn FnOnce()>) -> Timeout {
        Timeout::new(delay_ms, callback)
    }
}

pub struct BrowserClipboard {
    window: Window,
    document: Document,
}

impl Clipboard for BrowserClipboard {
    async fn write_text(&self, text: &str) -> Result<()> {
        let clipboard = Reflect::get(&self.window.navigator(), &JsValue::from_str("clipboard"))
            .ok()
            .and_then(|value| value.dyn_into::<web_sys::Clipboard>().ok())
            .ok_or_else(|| SiteError::js("navigator.clipboard", "unavailable"))?;

        JsFuture::from(clipboard.write_text(text))
            .await
            .map_err(|err| js_error("clipboard.writeText", &err))?;
        Ok(())
    }

    fn fallback_copy(&self, text: &str) -> Result<()> {
        let body = self
            .document
            .body()
            .ok_or_else(|| SiteError::missing("body"))?;
        let textarea = self
            .document
            .create_element("textarea")
            .map_err(|err| js_error("createElement(textarea)", &err))?
            .dyn_into::<HtmlTextAreaElement>()
            .map_err(|_| SiteError::js("createElement(textarea)", "unexpected element type"))?;

        textarea.set_value(text);
        let style = textarea.style();
        let _ = style.set_property("position", "fixed");
        let _ = style.set_property("opacity", "0");
        body.append_child(&textarea)
            .map_err(|err| js_error("appendChild", &err))?;
        textarea.select();

        let copied = match self.document.dyn_ref::<HtmlDocument>() {
            Some(document) => document
                .exec_command("copy")
                .map_err(|err| js_error("execCommand(copy)", &err)),
            None => Err(SiteError::js("execCommand(copy)", "not an HTML document")),
        };
        let _ = body.remove_child(&textarea);

        if copied? {
            Ok(())
        } else {
            Err(SiteError::js("execCommand(copy)", "command refused"))
        }
    }
}

pub struct BrowserObserver(IntersectionObserver);

impl Observer<Element> for BrowserObserver {
    fn observe(&self, target: &Element) {
        self.0.observe(target);
    }

    fn unobserve(&self, target: &Element) {
        self.0.unobserve(target);
    }
}

fn intersections(entries: &Array) -> Vec<Intersection<Element>> {
    entries
        .iter()
        .filter_map(|value| value.dyn_into::<IntersectionObserverEntry>().ok())
        .map(|entry| Intersection {
            target: entry.target(),
            is_intersecting: entry.is_intersecting(),
        })
        .collect()
}

fn supports_intersection_observer(window: &Window) -> bool {
    Reflect::has(window, &JsValue::from_str("IntersectionObserver")).unwrap_or(false)
}

struct Listener {
    target: EventTarget,
    event: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

impl Drop for Listener {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.event, self.callback.as_ref().unchecked_ref());
    }
}

struct Watcher {
    observer: IntersectionObserver,
    _callback: Closure<dyn FnMut(Array, IntersectionObserver)>,
}

impl Drop for Watcher {
    fn drop(&mut self) {
        self.observer.disconnect();
    }
}

/// Everything one component registered. Dropping it detaches the component.
#[derive(Default)]
pub struct Subscription {
    listeners: Vec<Listener>,
    watchers: Vec<Watcher>,
}

impl Subscription {
    fn listen(
        &mut self,
        target: &EventTarget,
        event: &'static str,
        handler: impl FnMut(Event) + 'static,
    ) -> Result<()> {
        self.register(target, event, handler, false)
    }

    fn listen_passive(
        &mut self,
        target: &EventTarget,
        event: &'static str,
        handler: impl FnMut(Event) + 'static,
    ) -> Result<()> {
        self.register(target, event, handler, true)
    }

    fn register(
        &mut self,
        target: &EventTarget,
        event: &'static str,
        handler: impl FnMut(Event) + 'static,
        passive: bool,
    ) -> Result<()> {
        let callback = Closure::<dyn FnMut(Event)>::new(handler);
        let registered = if passive {
            let options = AddEventListenerOptions::new();
            options.set_passive(true);
            target.add_event_listener_with_callback_and_add_event_listener_options(
                event,
                callback.as_ref().unchecked_ref(),
                &options,
            )
        } else {
            target.add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())
        };
        registered.map_err(|err| js_error("addEventListener", &err))?;

        self.listeners.push(Listener {
            target: target.clone(),
            event,
            callback,
        });
        Ok(())
    }

    fn watch(
        &mut self,
        threshold: Option<f64>,
        root_margin: &str,
        mut handler: impl FnMut(Vec<Intersection<Element>>, &BrowserObserver) + 'static,
    ) -> Result<BrowserObserver> {
        let callback = Closure::<dyn FnMut(Array, IntersectionObserver)>::new(
            move |entries: Array, observer: IntersectionObserver| {
                handler(intersections(&entries), &BrowserObserver(observer));
            },
        );

        let options = IntersectionObserverInit::new();
        options.set_root_margin(root_margin);
        if let Some(threshold) = threshold {
            options.set_threshold(&JsValue::from_f64(threshold));
        }
        let observer =
            IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &options)
                .map_err(|err| js_error("IntersectionObserver", &err))?;

        self.watchers.push(Watcher {
            observer: observer.clone(),
            _callback: callback,
        });
        Ok(BrowserObserver(observer))
    }
}

pub struct Site {
    window: Window,
    document: Document,
    config: SiteConfig,
}

impl Site {
    fn by_id(&self, id: &str) -> Option<Element> {
        self.document.get_element_by_id(id)
    }

    fn query(&self, selector: &str) -> Option<Element> {
        self.document.query_selector(selector).ok().flatten()
    }

    fn require(&self, selector: &str) -> Result<Element> {
        self.query(selector)
            .ok_or_else(|| SiteError::missing(selector))
    }

    fn query_all(&self, selector: &str) -> Vec<Element> {
        match self.document.query_selector_all(selector) {
            Ok(list) => elements(&list),
            Err(err) => {
                log::warn!("{}", js_error("querySelectorAll", &err));
                Vec::new()
            }
        }
    }

    fn body(&self) -> Result<Element> {
        self.document
            .body()
            .map(Element::from)
            .ok_or_else(|| SiteError::missing("body"))
    }

    fn viewport(&self) -> WindowViewport {
        WindowViewport(self.window.clone())
    }
}

fn elements(list: &NodeList) -> Vec<Element> {
    (0..list.length())
        .filter_map(|index| list.item(index))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

pub fn attach_theme(site: &Site) -> Result<Subscription> {
    let config = &site.config;
    let root = site
        .document
        .document_element()
        .ok_or_else(|| SiteError::missing("html"))?;
    let media = site.window.match_media(&config.dark_mode_query).ok().flatten();

    let themes = Rc::new(ThemeManager::new(root, LocalStorage::open(&site.window), config));
    themes.init(media.as_ref().is_some_and(MediaQueryList::matches));

    let mut subscription = Subscription::default();
    if let Some(toggle) = site.by_id(&config.theme_toggle_id) {
        let themes = Rc::clone(&themes);
        subscription.listen(&toggle, "click", move |_| {
            themes.toggle_theme();
        })?;
    }
    if let Some(media) = media {
        subscription.listen(&media, "change", move |event| {
            if let Some(change) = event.dyn_ref::<MediaQueryListEvent>() {
                themes.on_system_change(change.matches());
            }
        })?;
    }
    Ok(subscription)
}

pub fn attach_mobile_nav(site: &Site) -> Result<Subscription> {
    let config = &site.config;
    let (Some(toggle), Some(menu)) = (
        site.by_id(&config.nav_toggle_id),
        site.by_id(&config.nav_menu_id),
    ) else {
        log::debug!("no mobile nav on this page");
        return Ok(Subscription::default());
    };

    let links = menu
        .query_selector_all("a")
        .map(|list| elements(&list))
        .unwrap_or_default();
    let nav = Rc::new(MobileNav::new(toggle.clone(), menu, site.body()?, config));

    let mut subscription = Subscription::default();
    {
        let nav = Rc::clone(&nav);
        subscription.listen(&toggle, "click", move |_| {
            nav.toggle_menu();
        })?;
    }
    for link in links {
        let nav = Rc::clone(&nav);
        subscription.listen(&link, "click", move |_| nav.close_menu())?;
    }
    subscription.listen(&site.document, "click", move |event| {
        if let Some(target) = event.target().and_then(|target| target.dyn_into::<Element>().ok()) {
            nav.on_document_click(&target);
        }
    })?;
    Ok(subscription)
}

pub fn attach_copy_buttons(site: &Site) -> Result<Subscription> {
    let clipboard = BrowserClipboard {
        window: site.window.clone(),
        document: site.document.clone(),
    };
    let copy = Rc::new(CopyButtons::new(clipboard, GlooTimers, &site.config));

    let mut subscription = Subscription::default();
    for button in site.query_all(&site.config.copy_selector) {
        let copy = Rc::clone(&copy);
        let clicked = button.clone();
        subscription.listen(&button, "click", move |_| {
            let copy = Rc::clone(&copy);
            let button = clicked.clone();
            spawn_local(async move {
                copy.handle_copy(&button).await;
            });
        })?;
    }
    Ok(subscription)
}

pub fn attach_smooth_scroll(site: &Site) -> Result<Subscription> {
    let scroll = Rc::new(SmoothScroll::new(
        site.require(&site.config.nav_selector)?,
        site.viewport(),
    ));

    let mut subscription = Subscription::default();
    for anchor in site.query_all(&site.config.anchor_selector) {
        let scroll = Rc::clone(&scroll);
        let document = site.document.clone();
        let clicked = anchor.clone();
        subscription.listen(&anchor, "click", move |event| {
            let Some(href) = clicked.get_attribute("href") else {
                return;
            };
            if scroll
                .on_click(&href, |id| document.get_element_by_id(id))
                .prevents_default()
            {
                event.prevent_default();
            }
        })?;
    }
    Ok(subscription)
}

pub fn attach_scroll_animations(site: &Site) -> Result<Subscription> {
    let config = &site.config;
    let reveal = Rc::new(ScrollAnimations::new(
        site.query_all(&config.reveal_selector),
        config,
    ));

    let mut subscription = Subscription::default();
    if !supports_intersection_observer(&site.window) {
        log::debug!("IntersectionObserver unavailable, revealing everything");
        reveal.reveal_all();
        return Ok(subscription);
    }

    let handler = Rc::clone(&reveal);
    let observer = subscription.watch(
        Some(config.reveal_threshold),
        &config.reveal_root_margin,
        move |entries, observer| {
            handler.handle_intersect(&entries, observer);
        },
    )?;
    reveal.observe_all(&observer);
    Ok(subscription)
}

pub fn attach_nav_scroll(site: &Site) -> Result<Subscription> {
    let nav = site
        .by_id(&site.config.nav_id)
        .ok_or_else(|| SiteError::missing(&format!("#{}", site.config.nav_id)))?;
    let shadow = NavScroll::new(nav, &site.config);
    let viewport = site.viewport();

    let mut subscription = Subscription::default();
    subscription.listen_passive(&site.window, "scroll", move |_| {
        shadow.handle_scroll(viewport.scroll_y());
    })?;
    Ok(subscription)
}

pub fn attach_active_section(site: &Site) -> Result<Subscription> {
    let config = &site.config;
    let Some(active) = ActiveSection::new(
        site.query_all(&config.section_selector),
        site.query_all(&config.nav_link_selector),
        config,
    ) else {
        return Ok(Subscription::default());
    };
    let nav = site.require(&config.nav_selector)?;
    let viewport = site.viewport();

    let mut subscription = Subscription::default();
    subscription.listen_passive(&site.window, "scroll", move |_| {
        active.handle_scroll(viewport.scroll_y(), nav.offset_height());
    })?;
    Ok(subscription)
}

pub fn attach_lazy_iframe(site: &Site) -> Result<Subscription> {
    let mut subscription = Subscription::default();
    let Some(iframe) = site.query(&site.config.lazy_iframe_selector) else {
        return Ok(subscription);
    };
    if !supports_intersection_observer(&site.window) {
        log::debug!("IntersectionObserver unavailable, iframe loads eagerly");
        return Ok(subscription);
    }

    let lazy = Rc::new(LazyIframe::new(iframe));
    let handler = Rc::clone(&lazy);
    let observer = subscription.watch(None, &site.config.lazy_root_margin, move |entries, observer| {
        handler.handle_intersect(&entries, observer);
    })?;
    observer.observe(lazy.iframe());
    Ok(subscription)
}

fn load_config(document: &Document) -> Result<SiteConfig> {
    match document
        .get_element_by_id(CONFIG_ELEMENT_ID)
        .and_then(|element| element.text_content())
    {
        Some(raw) => SiteConfig::from_json(&raw),
        None => Ok(SiteConfig::default()),
    }
}

type Attach = fn(&Site) -> Result<Subscription>;

fn start(site: &Site) {
    let components: [(&str, Attach); 8] = [
        ("theme", attach_theme),
        ("mobile nav", attach_mobile_nav),
        ("copy buttons", attach_copy_buttons),
        ("smooth scroll", attach_smooth_scroll),
        ("scroll animations", attach_scroll_animations),
        ("nav scroll", attach_nav_scroll),
        ("active section", attach_active_section),
        ("lazy iframe", attach_lazy_iframe),
    ];

    let mut attached = Vec::with_capacity(components.len());
    for (name, attach) in components {
        match attach(site) {
            Ok(subscription) => attached.push(subscription),
            Err(err) => log::warn!("{name} not attached: {err}"),
        }
    }
    log::info!("attached {} of {} site behaviors", attached.len(), components.len());

    ATTACHED.with(|subscriptions| subscriptions.borrow_mut().extend(attached));
}

pub fn run() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);

    let Some(window) = window() else {
        return;
    };
    let Some(document) = window.document() else {
        return;
    };

    let config = load_config(&document).unwrap_or_else(|err| {
        log::warn!("{err}; using defaults");
        SiteConfig::default()
    });
    log::set_max_level(config.level().to_level_filter());

    let site = Site {
        window,
        document,
        config,
    };

    if site.document.ready_state() != "loading" {
        start(&site);
        return;
    }

    let document = site.document.clone();
    let boot = Closure::once(move || start(&site));
    if let Err(err) =
        document.add_event_listener_with_callback("DOMContentLoaded", boot.as_ref().unchecked_ref())
    {
        log::error!("{}", js_error("addEventListener(DOMContentLoaded)", &err));
        return;
    }
    boot.forget();
}
