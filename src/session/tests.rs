use super::*;
use crate::gateway::{GatewayError, GatewayReply, GatewayRequest, GatewayResponse, HostGateway};
use crate::input::{Key, KeyDisposition, KeyInput};
use crate::item::ItemId;
use crate::render::{OverlayRenderer, OverlayView, PointerTarget};
use std::time::{Duration, Instant};

#[derive(Default)]
struct RecordingGateway {
    sent: Vec<(RequestId, GatewayRequest)>,
    offline: bool,
}

impl RecordingGateway {
    fn last_id(&self, want: fn(&GatewayRequest) -> bool) -> RequestId {
        self.sent
            .iter()
            .rev()
            .find(|(_, request)| want(request))
            .map(|(id, _)| *id)
            .expect("matching request was sent")
    }

    fn count(&self, want: fn(&GatewayRequest) -> bool) -> usize {
        self.sent.iter().filter(|(_, request)| want(request)).count()
    }
}

impl HostGateway for RecordingGateway {
    fn submit(&mut self, id: RequestId, request: GatewayRequest) -> Result<(), GatewayError> {
        if self.offline {
            return Err(GatewayError::Unavailable("offline".to_string()));
        }
        self.sent.push((id, request));
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Painted {
    Mount(OverlayView),
    Update(OverlayView),
    Unmount,
}

#[derive(Default)]
struct RecordingRenderer {
    events: Vec<Painted>,
    live: usize,
    max_live: usize,
}

impl RecordingRenderer {
    fn last_view(&self) -> &OverlayView {
        self.events
            .iter()
            .rev()
            .find_map(|event| match event {
                Painted::Mount(view) | Painted::Update(view) => Some(view),
                Painted::Unmount => None,
            })
            .expect("a view was painted")
    }
}

impl OverlayRenderer for RecordingRenderer {
    fn mount(&mut self, view: &OverlayView) {
        self.live += 1;
        self.max_live = self.max_live.max(self.live);
        self.events.push(Painted::Mount(view.clone()));
    }

    fn update(&mut self, view: &OverlayView) {
        self.events.push(Painted::Update(view.clone()));
    }

    fn unmount(&mut self) {
        self.live -= 1;
        self.events.push(Painted::Unmount);
    }
}

type Controller = OverlayController<RecordingGateway, RecordingRenderer>;

fn is_get_items(request: &GatewayRequest) -> bool {
    matches!(request, GatewayRequest::GetItems)
}

fn is_get_zoom(request: &GatewayRequest) -> bool {
    matches!(request, GatewayRequest::GetZoom)
}

fn is_switch(request: &GatewayRequest) -> bool {
    matches!(request, GatewayRequest::SwitchTo { .. })
}

fn tabs(count: u64) -> Vec<Item> {
    (1..=count)
        .map(|n| Item::new(n, format!("tab {n}")))
        .collect()
}

fn controller() -> Controller {
    OverlayController::new(
        RecordingGateway::default(),
        RecordingRenderer::default(),
        ControllerSettings::default(),
    )
}

fn answer_items(ctl: &mut Controller, items: Vec<Item>) {
    let id = ctl.gateway().last_id(is_get_items);
    ctl.handle_reply(GatewayReply::ok(id, GatewayResponse::Items(items)));
}

fn open_with(count: u64) -> Controller {
    let mut ctl = controller();
    ctl.toggle();
    answer_items(&mut ctl, tabs(count));
    assert!(ctl.is_open());
    ctl
}

fn press(ctl: &mut Controller, input: KeyInput) -> KeyDisposition {
    ctl.handle_key(&input)
}

#[test]
fn toggle_from_closed_fetches_then_opens() {
    let mut ctl = controller();
    assert_eq!(ctl.phase(), OverlayPhase::Closed);
    ctl.toggle();
    assert_eq!(ctl.phase(), OverlayPhase::Opening);
    assert!(!ctl.is_capturing());
    assert!(!ctl.is_mounted());

    answer_items(&mut ctl, tabs(3));
    assert_eq!(ctl.phase(), OverlayPhase::Open);
    assert!(ctl.is_capturing());
    assert!(ctl.is_mounted());
    let view = ctl.renderer().last_view();
    assert_eq!(view.rows.len(), 3);
    assert_eq!(view.page_label, "Page 1 of 1");
    assert_eq!(ctl.gateway().count(is_get_zoom), 1);
}

#[test]
fn failed_fetch_stays_closed() {
    let mut ctl = controller();
    ctl.toggle();
    let id = ctl.gateway().last_id(is_get_items);
    ctl.handle_reply(GatewayReply::err(
        id,
        GatewayError::Unavailable("no receiver".to_string()),
    ));
    assert_eq!(ctl.phase(), OverlayPhase::Closed);
    assert!(!ctl.is_capturing());
    assert!(ctl.renderer().events.is_empty());
}

#[test]
fn malformed_fetch_stays_closed() {
    let mut ctl = controller();
    ctl.toggle();
    let id = ctl.gateway().last_id(is_get_items);
    ctl.handle_reply(GatewayReply::ok(id, GatewayResponse::Ack));
    assert_eq!(ctl.phase(), OverlayPhase::Closed);
    assert!(ctl.renderer().events.is_empty());
}

#[test]
fn unreachable_gateway_never_leaves_closed() {
    let mut ctl = OverlayController::new(
        RecordingGateway {
            offline: true,
            ..RecordingGateway::default()
        },
        RecordingRenderer::default(),
        ControllerSettings::default(),
    );
    ctl.toggle();
    assert_eq!(ctl.phase(), OverlayPhase::Closed);
}

#[test]
fn rapid_double_toggle_never_mounts_twice() {
    let mut ctl = controller();
    ctl.toggle();
    ctl.toggle();
    assert_eq!(ctl.phase(), OverlayPhase::Closed);
    // The late reply belongs to a cancelled open.
    answer_items(&mut ctl, tabs(4));
    assert_eq!(ctl.phase(), OverlayPhase::Closed);
    assert_eq!(ctl.renderer().max_live, 0);
    assert!(!ctl.is_capturing());
}

#[test]
fn triple_toggle_opens_once_with_latest_fetch() {
    let mut ctl = controller();
    ctl.toggle();
    let first = ctl.gateway().last_id(is_get_items);
    ctl.toggle();
    ctl.toggle();
    let second = ctl.gateway().last_id(is_get_items);
    assert_ne!(first, second);

    ctl.handle_reply(GatewayReply::ok(first, GatewayResponse::Items(tabs(2))));
    assert_eq!(ctl.phase(), OverlayPhase::Opening);
    ctl.handle_reply(GatewayReply::ok(second, GatewayResponse::Items(tabs(5))));
    assert!(ctl.is_open());
    assert_eq!(ctl.renderer().max_live, 1);
    assert_eq!(ctl.session().map(|s| s.items().len()), Some(5));
}

#[test]
fn toggle_while_open_closes_and_releases_capture() {
    let mut ctl = open_with(3);
    ctl.toggle();
    assert_eq!(ctl.phase(), OverlayPhase::Closed);
    assert!(!ctl.is_capturing());
    assert_eq!(ctl.renderer().live, 0);
    assert!(ctl.session().is_none());
}

#[test]
fn escape_closes_and_is_inert_when_closed() {
    let mut ctl = open_with(3);
    assert_eq!(
        press(&mut ctl, KeyInput::plain(Key::Escape)),
        KeyDisposition::Consumed
    );
    assert_eq!(ctl.phase(), OverlayPhase::Closed);
    assert!(!ctl.is_capturing());
    let events = ctl.renderer().events.len();

    assert_eq!(
        press(&mut ctl, KeyInput::plain(Key::Escape)),
        KeyDisposition::PassThrough
    );
    assert_eq!(ctl.phase(), OverlayPhase::Closed);
    assert_eq!(ctl.renderer().events.len(), events);
}

#[test]
fn keys_pass_through_while_opening() {
    let mut ctl = controller();
    ctl.toggle();
    assert_eq!(
        press(&mut ctl, KeyInput::char('1')),
        KeyDisposition::PassThrough
    );
}

#[test]
fn tab_pages_forward_and_back_with_wrap() {
    let mut ctl = open_with(23);
    press(&mut ctl, KeyInput::plain(Key::Tab));
    assert_eq!(ctl.session().map(Session::current_page), Some(1));
    press(&mut ctl, KeyInput::plain(Key::Tab));
    press(&mut ctl, KeyInput::plain(Key::Tab));
    assert_eq!(ctl.session().map(Session::current_page), Some(0));
    press(&mut ctl, KeyInput::plain(Key::BackTab).with_shift());
    assert_eq!(ctl.session().map(Session::current_page), Some(2));

    let view = ctl.renderer().last_view();
    assert_eq!(view.page_label, "Page 3 of 3");
    assert_eq!(view.rows.len(), 3);
    let hints: Vec<Option<char>> = view.rows.iter().map(|row| row.hint).collect();
    assert_eq!(hints, vec![Some('1'), Some('2'), Some('3')]);
    // Paging never refetches.
    assert_eq!(ctl.gateway().count(is_get_items), 1);
}

#[test]
fn hint_selects_item_on_current_page() {
    let mut ctl = open_with(23);
    press(&mut ctl, KeyInput::plain(Key::Tab));
    press(&mut ctl, KeyInput::char('3'));
    assert_eq!(ctl.phase(), OverlayPhase::Closed);
    assert!(!ctl.is_capturing());
    assert_eq!(ctl.gateway().count(is_switch), 1);
    let (_, request) = ctl.gateway().sent.last().expect("switch sent");
    assert_eq!(
        request,
        &GatewayRequest::SwitchTo {
            item_id: ItemId::Number(13)
        }
    );
    assert!(!ctl.refresh_pending());
}

#[test]
fn hint_past_partial_page_is_a_no_op() {
    let mut ctl = open_with(23);
    press(&mut ctl, KeyInput::plain(Key::BackTab).with_shift());
    assert_eq!(ctl.session().map(Session::current_page), Some(2));
    let events = ctl.renderer().events.len();
    assert_eq!(
        press(&mut ctl, KeyInput::char('4')),
        KeyDisposition::Consumed
    );
    assert!(ctl.is_open());
    assert_eq!(ctl.session().map(Session::current_page), Some(2));
    assert_eq!(ctl.gateway().count(is_switch), 0);
    assert_eq!(ctl.renderer().events.len(), events);
}

#[test]
fn empty_snapshot_shows_single_page_and_ignores_hints() {
    let mut ctl = open_with(0);
    let view = ctl.renderer().last_view().clone();
    assert!(view.rows.is_empty());
    assert_eq!(view.page_label, "Page 1 of 1");

    press(&mut ctl, KeyInput::char('1'));
    assert!(ctl.is_open());
    press(&mut ctl, KeyInput::plain(Key::Tab));
    assert!(ctl.is_open());
    assert_eq!(ctl.session().map(Session::current_page), Some(0));
    assert_eq!(ctl.renderer().last_view().page_label, "Page 1 of 1");
    assert_eq!(ctl.gateway().count(is_switch), 0);
}

#[test]
fn unknown_keys_are_swallowed_without_state_change() {
    let mut ctl = open_with(5);
    let events = ctl.renderer().events.len();
    for input in [
        KeyInput::char('z'),
        KeyInput::plain(Key::Enter),
        KeyInput::char('1').with_ctrl(),
        KeyInput::plain(Key::Other),
    ] {
        assert_eq!(press(&mut ctl, input), KeyDisposition::Consumed);
    }
    assert!(ctl.is_open());
    assert_eq!(ctl.renderer().events.len(), events);
    assert_eq!(ctl.gateway().count(is_switch), 0);
}

#[test]
fn stale_reference_is_dropped() {
    let mut ctl = open_with(3);
    let ghost = Item::new(99u64, "gone");
    assert!(!ctl.request_action(ItemAction::SwitchTo, &ghost));
    assert!(ctl.is_open());
    assert_eq!(ctl.gateway().count(is_switch), 0);
}

#[test]
fn request_action_while_closed_is_dropped() {
    let mut ctl = controller();
    assert!(!ctl.request_action(ItemAction::Close, &Item::new(1u64, "a")));
    assert!(ctl.gateway().sent.is_empty());
}

#[test]
fn late_zoom_reply_after_close_is_ignored() {
    let mut ctl = open_with(3);
    let zoom_id = ctl.gateway().last_id(is_get_zoom);
    ctl.toggle();
    ctl.handle_reply(GatewayReply::ok(zoom_id, GatewayResponse::Zoom(2.0)));
    assert_eq!(ctl.phase(), OverlayPhase::Closed);
    assert_eq!(ctl.renderer().live, 0);
}

#[test]
fn zoom_reply_updates_the_open_view() {
    let mut ctl = open_with(3);
    let zoom_id = ctl.gateway().last_id(is_get_zoom);
    ctl.handle_reply(GatewayReply::ok(zoom_id, GatewayResponse::Zoom(1.5)));
    assert_eq!(ctl.renderer().last_view().zoom, 1.5);
    assert_eq!(ctl.session().map(Session::zoom), Some(1.5));
    // A duplicate is no longer expected.
    ctl.handle_reply(GatewayReply::ok(zoom_id, GatewayResponse::Zoom(3.0)));
    assert_eq!(ctl.session().map(Session::zoom), Some(1.5));
}

#[test]
fn close_action_reopens_after_ack() {
    let mut ctl = open_with(12);
    ctl.handle_pointer(PointerTarget::Close(1));
    assert_eq!(ctl.phase(), OverlayPhase::Closed);
    assert!(ctl.refresh_pending());
    let (close_id, request) = ctl.gateway().sent.last().cloned().expect("close sent");
    assert_eq!(
        request,
        GatewayRequest::Close {
            item_id: ItemId::Number(2)
        }
    );
    assert_eq!(ctl.gateway().count(is_get_items), 1);

    ctl.handle_reply(GatewayReply::ok(close_id, GatewayResponse::Ack));
    assert_eq!(ctl.phase(), OverlayPhase::Opening);
    assert_eq!(ctl.gateway().count(is_get_items), 2);

    let mut refreshed = tabs(12);
    refreshed.remove(1);
    answer_items(&mut ctl, refreshed);
    assert!(ctl.is_open());
    assert_eq!(ctl.session().map(|s| s.items().len()), Some(11));
    assert_eq!(ctl.renderer().max_live, 1);
}

#[test]
fn pin_action_sends_flipped_state() {
    let mut ctl = controller();
    ctl.toggle();
    answer_items(
        &mut ctl,
        vec![Item::new(1u64, "a").pinned(true), Item::new(2u64, "b")],
    );
    ctl.handle_pointer(PointerTarget::TogglePin(0));
    let (_, request) = ctl.gateway().sent.last().cloned().expect("pin sent");
    assert_eq!(
        request,
        GatewayRequest::TogglePin {
            item_id: ItemId::Number(1),
            pinned: false
        }
    );
}

#[test]
fn failed_mutation_still_refreshes() {
    let mut ctl = open_with(4);
    ctl.handle_pointer(PointerTarget::TogglePin(0));
    let (pin_id, _) = ctl.gateway().sent.last().cloned().expect("pin sent");
    ctl.handle_reply(GatewayReply::err(
        pin_id,
        GatewayError::Rejected("restricted".to_string()),
    ));
    assert_eq!(ctl.phase(), OverlayPhase::Opening);
    answer_items(&mut ctl, tabs(4));
    assert!(ctl.is_open());
}

#[test]
fn refresh_fallback_fires_without_ack() {
    let mut ctl = open_with(4);
    ctl.handle_pointer(PointerTarget::Close(0));
    let deadline = ctl.next_deadline().expect("fallback scheduled");

    ctl.poll_timers(deadline - Duration::from_millis(1));
    assert_eq!(ctl.phase(), OverlayPhase::Closed);

    ctl.poll_timers(deadline);
    assert_eq!(ctl.phase(), OverlayPhase::Opening);
    assert!(!ctl.refresh_pending());
    // Only the open timeout is left to watch.
    let open_deadline = ctl.next_deadline().expect("open timeout scheduled");
    assert!(open_deadline > deadline);
}

#[test]
fn open_times_out_when_items_never_arrive() {
    let mut ctl = controller();
    ctl.toggle();
    let stalled = ctl.gateway().last_id(is_get_items);
    let deadline = ctl.next_deadline().expect("open timeout scheduled");

    ctl.poll_timers(deadline - Duration::from_millis(1));
    assert_eq!(ctl.phase(), OverlayPhase::Opening);

    ctl.poll_timers(deadline);
    assert_eq!(ctl.phase(), OverlayPhase::Closed);
    assert!(!ctl.is_mounted());
    assert!(!ctl.is_capturing());
    assert_eq!(ctl.next_deadline(), None);
    assert!(ctl.renderer().events.is_empty());

    // A reply that shows up after giving up must not mount anything.
    ctl.handle_reply(GatewayReply::ok(stalled, GatewayResponse::Items(tabs(3))));
    assert_eq!(ctl.phase(), OverlayPhase::Closed);
    assert!(ctl.renderer().events.is_empty());

    ctl.toggle();
    assert_eq!(ctl.phase(), OverlayPhase::Opening);
    answer_items(&mut ctl, tabs(2));
    assert!(ctl.is_open());
    assert_eq!(ctl.renderer().max_live, 1);
}

#[test]
fn open_timeout_tracks_the_configured_duration() {
    let settings = ControllerSettings {
        open_timeout: Duration::from_millis(200),
        ..ControllerSettings::default()
    };
    let mut ctl = OverlayController::new(
        RecordingGateway::default(),
        RecordingRenderer::default(),
        settings,
    );
    let before = Instant::now();
    ctl.toggle();
    let deadline = ctl.next_deadline().expect("open timeout scheduled");
    assert!(deadline >= before + Duration::from_millis(200));
    assert!(deadline <= Instant::now() + Duration::from_millis(200));
}

#[test]
fn toggle_cancels_pending_refresh() {
    let mut ctl = open_with(4);
    ctl.handle_pointer(PointerTarget::Close(0));
    let (close_id, _) = ctl.gateway().sent.last().cloned().expect("close sent");
    ctl.toggle();
    assert!(!ctl.refresh_pending());
    assert_eq!(ctl.phase(), OverlayPhase::Opening);
    let fetches = ctl.gateway().count(is_get_items);

    // The ack arrives late and must not start a second open.
    ctl.handle_reply(GatewayReply::ok(close_id, GatewayResponse::Ack));
    assert_eq!(ctl.gateway().count(is_get_items), fetches);
    ctl.poll_timers(Instant::now() + Duration::from_secs(60));
    assert_eq!(ctl.gateway().count(is_get_items), fetches);
}

#[test]
fn pointer_navigation_and_selection() {
    let mut ctl = open_with(15);
    ctl.handle_pointer(PointerTarget::NextPage);
    assert_eq!(ctl.session().map(Session::current_page), Some(1));
    ctl.handle_pointer(PointerTarget::PrevPage);
    ctl.handle_pointer(PointerTarget::PrevPage);
    assert_eq!(ctl.session().map(Session::current_page), Some(1));
    // Slot 7 is empty on the five-item second page.
    ctl.handle_pointer(PointerTarget::Item(7));
    assert!(ctl.is_open());
    ctl.handle_pointer(PointerTarget::Item(4));
    assert_eq!(ctl.phase(), OverlayPhase::Closed);
    let (_, request) = ctl.gateway().sent.last().cloned().expect("switch sent");
    assert_eq!(
        request,
        GatewayRequest::SwitchTo {
            item_id: ItemId::Number(15)
        }
    );
}

#[test]
fn pointer_is_ignored_while_closed() {
    let mut ctl = controller();
    ctl.handle_pointer(PointerTarget::Item(0));
    ctl.handle_pointer(PointerTarget::NextPage);
    assert!(ctl.gateway().sent.is_empty());
}

#[test]
fn dismiss_cancels_an_in_flight_open() {
    let mut ctl = controller();
    ctl.toggle();
    ctl.dismiss();
    assert_eq!(ctl.phase(), OverlayPhase::Closed);
    answer_items(&mut ctl, tabs(2));
    assert_eq!(ctl.phase(), OverlayPhase::Closed);
    ctl.dismiss();
    assert_eq!(ctl.phase(), OverlayPhase::Closed);
}

#[test]
fn reopening_builds_a_fresh_session() {
    let mut ctl = open_with(23);
    press(&mut ctl, KeyInput::plain(Key::Tab));
    let first = ctl.session().map(Session::id).expect("session");
    ctl.toggle();
    ctl.toggle();
    answer_items(&mut ctl, tabs(23));
    let session = ctl.session().expect("session");
    assert_ne!(session.id(), first);
    assert_eq!(session.current_page(), 0);
}
