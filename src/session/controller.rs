use std::time::{Duration, Instant};

use super::{Session, SessionId};
use crate::config::{DEFAULT_OPEN_TIMEOUT_MS, DEFAULT_REFRESH_FALLBACK_MS};
use crate::gateway::{
    GatewayError, GatewayReply, GatewayRequest, GatewayResponse, HostGateway, RequestId,
};
use crate::hints::HintAlphabet;
use crate::input::{InputRouter, KeyDisposition, KeyInput, RouteOutcome};
use crate::item::Item;
use crate::log_debug;
use crate::pagination::PAGE_SIZE;
use crate::render::{OverlayRenderer, PointerTarget};

#[derive(Debug, Clone)]
pub struct ControllerSettings {
    pub alphabet: HintAlphabet,
    pub page_size: usize,
    /// How long to wait for a mutation ack before refreshing anyway.
    pub refresh_fallback: Duration,
    /// How long `getItems` may stay unanswered before the open is abandoned.
    pub open_timeout: Duration,
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self {
            alphabet: HintAlphabet::default(),
            page_size: PAGE_SIZE,
            refresh_fallback: Duration::from_millis(DEFAULT_REFRESH_FALLBACK_MS),
            open_timeout: Duration::from_millis(DEFAULT_OPEN_TIMEOUT_MS),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemAction {
    SwitchTo,
    Close,
    TogglePin,
}

/// Externally visible controller state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayPhase {
    Closed,
    /// `getItems` is in flight; nothing is mounted or captured yet.
    Opening,
    Open,
}

enum Phase {
    Closed,
    Opening {
        request: RequestId,
        session: SessionId,
        deadline: Instant,
    },
    Open(Session),
}

/// A close/pin is waiting for the host before the overlay reopens.
#[derive(Debug, Clone, Copy)]
struct PendingRefresh {
    request: RequestId,
    deadline: Instant,
}

/// Owns the overlay lifecycle: the session, the keyboard capture, the
/// mounted renderer and every gateway request made on their behalf.
///
/// Runs on the host's event loop thread. Gateway replies are fed back through
/// [`OverlayController::handle_reply`] and checked against the live session
/// before anything is applied.
pub struct OverlayController<G, R> {
    gateway: G,
    renderer: R,
    settings: ControllerSettings,
    phase: Phase,
    router: Option<InputRouter>,
    mounted: bool,
    refresh: Option<PendingRefresh>,
    next_request: u64,
    next_session: u64,
}

impl<G: HostGateway, R: OverlayRenderer> OverlayController<G, R> {
    pub fn new(gateway: G, renderer: R, settings: ControllerSettings) -> Self {
        Self {
            gateway,
            renderer,
            settings,
            phase: Phase::Closed,
            router: None,
            mounted: false,
            refresh: None,
            next_request: 1,
            next_session: 1,
        }
    }

    pub fn phase(&self) -> OverlayPhase {
        match self.phase {
            Phase::Closed => OverlayPhase::Closed,
            Phase::Opening { .. } => OverlayPhase::Opening,
            Phase::Open(_) => OverlayPhase::Open,
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self.phase, Phase::Open(_))
    }

    /// True while the overlay owns the keyboard.
    pub fn is_capturing(&self) -> bool {
        self.router.is_some()
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn session(&self) -> Option<&Session> {
        match &self.phase {
            Phase::Open(session) => Some(session),
            _ => None,
        }
    }

    pub fn refresh_pending(&self) -> bool {
        self.refresh.is_some()
    }

    /// Earliest instant at which [`Self::poll_timers`] has work to do.
    pub fn next_deadline(&self) -> Option<Instant> {
        let opening = match self.phase {
            Phase::Opening { deadline, .. } => Some(deadline),
            _ => None,
        };
        opening
            .into_iter()
            .chain(self.refresh.map(|pending| pending.deadline))
            .min()
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    /// Global shortcut entry point.
    pub fn toggle(&mut self) {
        match self.phase {
            Phase::Closed => {
                if self.refresh.take().is_some() {
                    log_debug("toggle supersedes pending refresh");
                }
                self.begin_open();
            }
            Phase::Opening { .. } => self.close_overlay("toggle while opening"),
            Phase::Open(_) => self.close_overlay("toggle"),
        }
    }

    /// Close if open or opening; no effect when already closed.
    pub fn dismiss(&mut self) {
        if !matches!(self.phase, Phase::Closed) {
            self.close_overlay("dismiss");
        }
    }

    pub fn handle_key(&mut self, input: &KeyInput) -> KeyDisposition {
        let Some(router) = self.router.as_ref() else {
            return KeyDisposition::PassThrough;
        };
        match router.classify(input) {
            RouteOutcome::Dismiss => self.close_overlay("escape"),
            RouteOutcome::PageForward => self.turn_page(true),
            RouteOutcome::PageBackward => self.turn_page(false),
            RouteOutcome::Hint(slot) => self.act_on_slot(ItemAction::SwitchTo, slot),
            RouteOutcome::Ignored => {}
        }
        KeyDisposition::Consumed
    }

    pub fn handle_pointer(&mut self, target: PointerTarget) {
        if !self.is_open() {
            return;
        }
        match target {
            PointerTarget::Item(slot) => self.act_on_slot(ItemAction::SwitchTo, slot),
            PointerTarget::Close(slot) => self.act_on_slot(ItemAction::Close, slot),
            PointerTarget::TogglePin(slot) => self.act_on_slot(ItemAction::TogglePin, slot),
            PointerTarget::PrevPage => self.turn_page(false),
            PointerTarget::NextPage => self.turn_page(true),
        }
    }

    /// Forward `action` for `item` and close. Returns false when the item is
    /// not part of the open snapshot (or nothing is open) and the action was
    /// dropped.
    pub fn request_action(&mut self, action: ItemAction, item: &Item) -> bool {
        let Phase::Open(session) = &self.phase else {
            log_debug(&format!("dropping {action:?} for {}: overlay not open", item.id));
            return false;
        };
        // The snapshot copy is authoritative for the current pin state.
        let Some(current) = session.items().iter().find(|it| it.id == item.id) else {
            log_debug(&format!("dropping {action:?}: stale reference to {}", item.id));
            return false;
        };
        let request = match action {
            ItemAction::SwitchTo => GatewayRequest::SwitchTo {
                item_id: current.id.clone(),
            },
            ItemAction::Close => GatewayRequest::Close {
                item_id: current.id.clone(),
            },
            ItemAction::TogglePin => GatewayRequest::TogglePin {
                item_id: current.id.clone(),
                pinned: !current.pinned,
            },
        };
        let id = self.allocate_request();
        let submitted = self.gateway.submit(id, request);
        self.close_overlay("action");
        tracing::info!(request = id.0, action = ?action, "item action requested");

        match (action, submitted) {
            (ItemAction::SwitchTo, Ok(())) => {}
            (ItemAction::SwitchTo, Err(err)) => log_debug(&format!("switch failed: {err}")),
            (_, Ok(())) => {
                self.refresh = Some(PendingRefresh {
                    request: id,
                    deadline: Instant::now() + self.settings.refresh_fallback,
                });
            }
            (_, Err(err)) => {
                log_debug(&format!("{action:?} not delivered ({err}); refreshing anyway"));
                self.begin_open();
            }
        }
        true
    }

    pub fn handle_reply(&mut self, reply: GatewayReply) {
        if let Phase::Opening {
            request, session, ..
        } = self.phase
        {
            if request == reply.id {
                self.finish_open(session, reply.result);
                return;
            }
        }

        if let Phase::Open(session) = &mut self.phase {
            if session.awaiting_zoom(reply.id) {
                match reply.result {
                    Ok(GatewayResponse::Zoom(zoom)) => {
                        session.apply_zoom(zoom);
                        self.render_update();
                    }
                    Ok(other) => {
                        session.clear_zoom_request();
                        log_debug(&format!("ignoring non-zoom reply to getZoom: {other:?}"));
                    }
                    Err(err) => {
                        session.clear_zoom_request();
                        log_debug(&format!("zoom lookup failed: {err}"));
                    }
                }
                return;
            }
        }

        if self
            .refresh
            .is_some_and(|pending| pending.request == reply.id)
        {
            self.refresh = None;
            if let Err(err) = &reply.result {
                log_debug(&format!("mutation {} failed ({err}); refreshing unchanged", reply.id));
            }
            if matches!(self.phase, Phase::Closed) {
                self.begin_open();
            }
            return;
        }

        log_debug(&format!("dropping stale gateway reply {}", reply.id));
    }

    /// Abandon an unanswered open, and fire the refresh fallback if the host
    /// never acknowledged a mutation.
    pub fn poll_timers(&mut self, now: Instant) {
        if let Phase::Opening {
            request, deadline, ..
        } = self.phase
        {
            if now >= deadline {
                // Nothing is mounted or captured while opening.
                self.phase = Phase::Closed;
                let err = GatewayError::Unavailable(format!(
                    "no reply to getItems {request} within {:?}",
                    self.settings.open_timeout
                ));
                log_debug(&format!("overlay open aborted: {err}"));
                tracing::info!(request = request.0, "overlay open timed out");
            }
        }

        let Some(pending) = self.refresh else {
            return;
        };
        if now < pending.deadline {
            return;
        }
        self.refresh = None;
        log_debug(&format!(
            "no ack for mutation {} within {:?}; refreshing",
            pending.request, self.settings.refresh_fallback
        ));
        if matches!(self.phase, Phase::Closed) {
            self.begin_open();
        }
    }

    fn begin_open(&mut self) {
        let request = self.allocate_request();
        let session = SessionId(self.next_session);
        self.next_session += 1;
        match self.gateway.submit(request, GatewayRequest::GetItems) {
            Ok(()) => {
                self.phase = Phase::Opening {
                    request,
                    session,
                    deadline: Instant::now() + self.settings.open_timeout,
                };
                tracing::debug!(request = request.0, session = session.0, "overlay opening");
            }
            Err(err) => log_debug(&format!("overlay open aborted: {err}")),
        }
    }

    fn finish_open(
        &mut self,
        session_id: SessionId,
        result: Result<GatewayResponse, GatewayError>,
    ) {
        let items = match result {
            Ok(GatewayResponse::Items(items)) => items,
            Ok(other) => {
                self.phase = Phase::Closed;
                log_debug(&format!("overlay open aborted: getItems answered with {other:?}"));
                return;
            }
            Err(err) => {
                self.phase = Phase::Closed;
                log_debug(&format!("overlay open aborted: {err}"));
                return;
            }
        };

        let mut session = Session::new(session_id, items, self.settings.page_size);
        let zoom_request = self.allocate_request();
        match self.gateway.submit(zoom_request, GatewayRequest::GetZoom) {
            Ok(()) => session.expect_zoom(zoom_request),
            Err(err) => log_debug(&format!("zoom lookup not sent: {err}")),
        }
        let view = session.view(&self.settings.alphabet);
        tracing::info!(
            session = session_id.0,
            items = session.items().len(),
            pages = session.pagination().total_pages(),
            "overlay opened"
        );

        self.router = Some(InputRouter::install(
            self.settings.alphabet.clone(),
            self.settings.page_size,
        ));
        self.phase = Phase::Open(session);
        if self.mounted {
            self.renderer.update(&view);
        } else {
            self.renderer.mount(&view);
            self.mounted = true;
        }
    }

    fn close_overlay(&mut self, reason: &str) {
        // Capture is released before anything else so no key lands on a
        // half-torn-down overlay.
        self.router = None;
        let previous = std::mem::replace(&mut self.phase, Phase::Closed);
        if self.mounted {
            self.renderer.unmount();
            self.mounted = false;
        }
        match previous {
            Phase::Open(session) => {
                tracing::info!(session = session.id().0, reason, "overlay closed");
            }
            Phase::Opening {
                request, session, ..
            } => {
                log_debug(&format!(
                    "open {session} cancelled ({reason}); reply {request} will be dropped"
                ));
            }
            Phase::Closed => {}
        }
    }

    fn turn_page(&mut self, forward: bool) {
        let Phase::Open(session) = &mut self.phase else {
            return;
        };
        if forward {
            session.next_page();
        } else {
            session.prev_page();
        }
        self.render_update();
    }

    fn act_on_slot(&mut self, action: ItemAction, slot: usize) {
        let item = self.session().and_then(|s| s.item_for_slot(slot)).cloned();
        match item {
            Some(item) => {
                self.request_action(action, &item);
            }
            None => log_debug(&format!("slot {slot} is empty on this page; ignoring")),
        }
    }

    fn render_update(&mut self) {
        if let Phase::Open(session) = &self.phase {
            if self.mounted {
                let view = session.view(&self.settings.alphabet);
                self.renderer.update(&view);
            }
        }
    }

    fn allocate_request(&mut self) -> RequestId {
        let id = RequestId(self.next_request);
        self.next_request += 1;
        id
    }
}
