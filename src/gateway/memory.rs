//! In-process host: a tab store served from a worker thread.

use crossbeam_channel::{unbounded, Sender};
use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use super::{
    GatewayError, GatewayReply, GatewayRequest, GatewayResponse, HostGateway, RequestId,
};
use serde::Deserialize;

use crate::item::{Item, ItemId};
use crate::{lock_or_recover, log_debug};

#[derive(Deserialize)]
#[serde(untagged)]
enum SeedFile {
    Tabs(Vec<Item>),
    #[serde(rename_all = "camelCase")]
    Window {
        tabs: Vec<Item>,
        #[serde(default)]
        zoom_factor: Option<f64>,
    },
}

/// The host's authoritative tab list, in display order.
///
/// Pinned tabs are kept ahead of unpinned ones, the way browsers order them.
#[derive(Debug, Clone, PartialEq)]
pub struct TabStore {
    tabs: Vec<Item>,
    active: Option<ItemId>,
    zoom: f64,
}

impl TabStore {
    pub fn new(tabs: Vec<Item>) -> Self {
        let mut store = Self {
            active: tabs.first().map(|tab| tab.id.clone()),
            tabs,
            zoom: 1.0,
        };
        store.normalize_pin_order();
        store
    }

    /// Load a tabs file: either a bare JSON item array, e.g. exported from a
    /// browser, or `{"zoomFactor": 1.25, "tabs": [...]}`.
    pub fn from_json_file(path: &Path) -> anyhow::Result<Self> {
        use anyhow::Context;
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read tabs file {}", path.display()))?;
        let seed: SeedFile = serde_json::from_str(&raw).with_context(|| {
            format!(
                "tabs file {} is neither an item array nor {{\"tabs\": [...]}}",
                path.display()
            )
        })?;
        Ok(match seed {
            SeedFile::Tabs(tabs) => Self::new(tabs),
            SeedFile::Window { tabs, zoom_factor } => {
                let mut store = Self::new(tabs);
                if let Some(zoom) = zoom_factor {
                    store.set_zoom(zoom);
                }
                store
            }
        })
    }

    /// A plausible window worth of tabs for demos.
    pub fn sample() -> Self {
        const TITLES: &[&str] = &[
            "Inbox (3) - Mail",
            "rust-lang/rust: Empowering everyone",
            "crossterm - Rust",
            "The Rust Programming Language",
            "Pull requests · tabhint",
            "Calendar - Week of the 12th",
            "Weather forecast",
            "serde_json - Rust",
            "Release notes",
            "Design review notes",
            "CI pipeline #4812",
            "Hacker News",
            "Standard library docs",
            "Team wiki - On-call",
            "crossbeam-channel - Rust",
            "Flight status",
            "Grocery list",
            "Music - Focus mix",
            "Benchmark dashboard",
            "Issue #311: page wrap",
            "tracing - Rust",
            "Docs: keyboard shortcuts",
            "Video call",
        ];
        let tabs = TITLES
            .iter()
            .enumerate()
            .map(|(idx, title)| Item::new(idx as u64 + 1, *title).pinned(idx < 2))
            .collect();
        Self::new(tabs)
    }

    pub fn tabs(&self) -> &[Item] {
        &self.tabs
    }

    pub fn active(&self) -> Option<&ItemId> {
        self.active.as_ref()
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn set_zoom(&mut self, zoom: f64) {
        if zoom.is_finite() && zoom > 0.0 {
            self.zoom = zoom;
        }
    }

    fn position(&self, id: &ItemId) -> Result<usize, GatewayError> {
        self.tabs
            .iter()
            .position(|tab| &tab.id == id)
            .ok_or_else(|| GatewayError::Rejected(format!("no tab with id {id}")))
    }

    fn normalize_pin_order(&mut self) {
        // Stable: relative order within each group is preserved.
        self.tabs.sort_by_key(|tab| !tab.pinned);
    }

    pub fn apply(&mut self, request: &GatewayRequest) -> Result<GatewayResponse, GatewayError> {
        match request {
            GatewayRequest::GetItems => Ok(GatewayResponse::Items(self.tabs.clone())),
            GatewayRequest::GetZoom => Ok(GatewayResponse::Zoom(self.zoom)),
            GatewayRequest::SwitchTo { item_id } => {
                self.position(item_id)?;
                self.active = Some(item_id.clone());
                Ok(GatewayResponse::Ack)
            }
            GatewayRequest::Close { item_id } => {
                let idx = self.position(item_id)?;
                if self.tabs.len() == 1 {
                    return Err(GatewayError::Rejected(
                        "refusing to close the last tab".to_string(),
                    ));
                }
                self.tabs.remove(idx);
                if self.active.as_ref() == Some(item_id) {
                    let next = idx.min(self.tabs.len() - 1);
                    self.active = self.tabs.get(next).map(|tab| tab.id.clone());
                }
                Ok(GatewayResponse::Ack)
            }
            GatewayRequest::TogglePin { item_id, pinned } => {
                let idx = self.position(item_id)?;
                let mut tab = self.tabs.remove(idx);
                tab.pinned = *pinned;
                // Lands on the pinned/unpinned boundary: last of the pinned
                // group when pinning, first of the rest when unpinning.
                let at = self.tabs.iter().take_while(|t| t.pinned).count();
                self.tabs.insert(at, tab);
                Ok(GatewayResponse::Ack)
            }
        }
    }
}

type Job = (RequestId, GatewayRequest);

/// Gateway backed by a shared [`TabStore`].
///
/// Requests are queued to a worker thread that optionally sleeps to imitate
/// host latency, applies the request, and posts the reply.
pub struct MemoryGateway {
    jobs: Sender<Job>,
    store: Arc<Mutex<TabStore>>,
}

impl MemoryGateway {
    pub fn spawn(
        store: Arc<Mutex<TabStore>>,
        replies: Sender<GatewayReply>,
        latency: Duration,
    ) -> Self {
        let (jobs, job_rx) = unbounded::<Job>();
        let worker_store = Arc::clone(&store);
        thread::spawn(move || {
            for (id, request) in job_rx {
                if !latency.is_zero() {
                    thread::sleep(latency);
                }
                let result = {
                    let mut store = lock_or_recover(&worker_store, "memory gateway");
                    store.apply(&request)
                };
                if let Err(err) = &result {
                    log_debug(&format!("memory host {id} {:?} failed: {err}", request.kind()));
                }
                if replies.send(GatewayReply { id, result }).is_err() {
                    break;
                }
            }
        });
        Self { jobs, store }
    }

    pub fn store(&self) -> Arc<Mutex<TabStore>> {
        Arc::clone(&self.store)
    }
}

impl HostGateway for MemoryGateway {
    fn submit(&mut self, id: RequestId, request: GatewayRequest) -> Result<(), GatewayError> {
        self.jobs
            .send((id, request))
            .map_err(|_| GatewayError::Unavailable("memory host worker stopped".to_string()))
    }
}
