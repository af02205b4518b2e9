//! Which tab host the binary talks to, and the page it shows under the overlay.

use anyhow::{Context, Result};
use crossbeam_channel::Sender;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tabhint::config::{AppConfig, HostSource};
use tabhint::gateway::{
    GatewayError, GatewayReply, GatewayRequest, GatewayResponse, HostGateway, MemoryGateway,
    RequestId, StdioGateway, TabStore,
};
use tabhint::item::{Item, ItemId};

/// Either the built-in tab host or an external host process.
pub(crate) enum HostLink {
    Memory(MemoryGateway),
    Stdio(StdioGateway),
}

impl HostLink {
    pub(crate) fn connect(config: &AppConfig, replies: Sender<GatewayReply>) -> Result<Self> {
        let store = match config.host_source()? {
            HostSource::Command { program, args } => {
                let gateway = StdioGateway::spawn(&program, &args, replies)?;
                return Ok(HostLink::Stdio(gateway));
            }
            HostSource::TabsFile(path) => TabStore::from_json_file(&path)
                .with_context(|| format!("failed to load --tabs-file '{}'", path.display()))?,
            HostSource::Sample => TabStore::sample(),
        };
        let store = Arc::new(Mutex::new(store));
        Ok(HostLink::Memory(MemoryGateway::spawn(
            store,
            replies,
            config.host_latency(),
        )))
    }

    pub(crate) fn store(&self) -> Option<Arc<Mutex<TabStore>>> {
        match self {
            HostLink::Memory(gateway) => Some(gateway.store()),
            HostLink::Stdio(_) => None,
        }
    }

    pub(crate) fn label(&self) -> &'static str {
        match self {
            HostLink::Memory(_) => "built-in host",
            HostLink::Stdio(_) => "external host",
        }
    }
}

impl HostGateway for HostLink {
    fn submit(&mut self, id: RequestId, request: GatewayRequest) -> Result<(), GatewayError> {
        match self {
            HostLink::Memory(gateway) => gateway.submit(id, request),
            HostLink::Stdio(gateway) => gateway.submit(id, request),
        }
    }
}

/// One `getItems` round-trip outside the overlay, for `--list-tabs`.
pub(crate) fn fetch_items(
    link: &mut HostLink,
    replies: &crossbeam_channel::Receiver<GatewayReply>,
    timeout: Duration,
) -> Result<Vec<Item>> {
    let id = RequestId(0);
    link.submit(id, GatewayRequest::GetItems)
        .context("host rejected getItems")?;
    loop {
        let reply = replies
            .recv_timeout(timeout)
            .context("host did not answer getItems in time")?;
        if reply.id != id {
            continue;
        }
        return match reply.result {
            Ok(GatewayResponse::Items(items)) => Ok(items),
            Ok(other) => anyhow::bail!("unexpected reply to getItems: {other:?}"),
            Err(err) => Err(err).context("getItems failed"),
        };
    }
}

pub(crate) fn format_tab_listing(items: &[Item]) -> String {
    let mut out = String::new();
    for (idx, item) in items.iter().enumerate() {
        let pin = if item.pinned { "[pinned] " } else { "" };
        out.push_str(&format!(
            "{:>3}  {pin}{}  (id {})\n",
            idx + 1,
            item.display_title(),
            item.id
        ));
    }
    if items.is_empty() {
        out.push_str("no tabs\n");
    }
    out
}

/// The "page" behind the overlay: the host's tab strip plus a status line.
#[derive(Debug, Default)]
pub(crate) struct HostPage {
    pub(crate) tabs: Vec<Item>,
    pub(crate) active: Option<ItemId>,
    pub(crate) status: String,
}

impl HostPage {
    /// Pull the latest tabs from a shared store, when there is one.
    pub(crate) fn sync_from(&mut self, store: Option<&Arc<Mutex<TabStore>>>) {
        let Some(store) = store else {
            return;
        };
        let store = store.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        self.tabs = store.tabs().to_vec();
        self.active = store.active().cloned();
    }

    pub(crate) fn set_status(&mut self, status: impl Into<String>) {
        self.status = status.into();
    }
}
