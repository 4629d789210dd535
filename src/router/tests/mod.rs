use super::*;
use crate::coords::Coordinates;
use crate::peer::LOCAL_PORT;
use crate::protocol::{AddressScheme, Frame};
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;


pub(super) fn make_key(val: u8) -> PublicKey {
    let mut bytes = [0u8; 32];
    bytes[0] = val;
    PublicKey::from_bytes(bytes)
}

pub(super) fn make_coords(ports: &[PortId]) -> Coordinates {
    Coordinates::new(ports.to_vec())
}

pub(super) fn make_peer(port: PortId) -> (Arc<Peer>, PeerRx) {
    Peer::new(port, Some(make_key(port as u8)), 16)
}

/// Resolver double: answers by frame type and records every lookup.
#[derive(Default)]
pub(super) struct ScriptedResolver {
    routes: Mutex<HashMap<FrameType, NextHop>>,
    calls: Mutex<Vec<(PortId, Frame)>>,
}

impl ScriptedResolver {
    pub(super) fn route(&self, frame_type: FrameType, next_hop: NextHop) {
        self.routes.lock().unwrap().insert(frame_type, next_hop);
    }

    pub(super) fn calls(&self) -> Vec<(PortId, Frame)> {
        self.calls.lock().unwrap().clone()
    }
}

impl NextHopResolver for ScriptedResolver {
    fn resolve(&self, from: &Peer, frame: &Frame) -> NextHop {
        self.calls.lock().unwrap().push((from.port(), frame.clone()));
        self.routes
            .lock()
            .unwrap()
            .get(&frame.frame_type())
            .cloned()
            .unwrap_or(NextHop::NoRoute)
    }
}

/// One recorded handler invocation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(super) struct HandlerCall {
    pub handler: &'static str,
    pub port: PortId,
    pub frame_type: FrameType,
    /// For setup: port of the hop passed in, if any.
    pub next_port: Option<PortId>,
}

/// Handler double: records calls, optionally fails one handler.
pub(super) struct RecordingHandlers {
    calls: Mutex<Vec<HandlerCall>>,
    failing: Mutex<Option<&'static str>>,
    teardown_hop: Mutex<NextHop>,
    coords: Coordinates,
}

impl RecordingHandlers {
    pub(super) fn new(coords: Coordinates) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            failing: Mutex::new(None),
            teardown_hop: Mutex::new(NextHop::NoRoute),
            coords,
        }
    }

    pub(super) fn fail(&self, handler: &'static str) {
        *self.failing.lock().unwrap() = Some(handler);
    }

    pub(super) fn set_teardown_hop(&self, next_hop: NextHop) {
        *self.teardown_hop.lock().unwrap() = next_hop;
    }

    pub(super) fn calls(&self) -> Vec<HandlerCall> {
        self.calls.lock().unwrap().clone()
    }

    fn record(
        &self,
        handler: &'static str,
        from: &Peer,
        frame: &Frame,
        next_hop: Option<&NextHop>,
    ) -> Result<(), HandlerError> {
        self.calls.lock().unwrap().push(HandlerCall {
            handler,
            port: from.port(),
            frame_type: frame.frame_type(),
            next_port: next_hop.and_then(|hop| hop.peer()).map(|peer| peer.port()),
        });
        if *self.failing.lock().unwrap() == Some(handler) {
            return Err(HandlerError::Rejected(format!("{} refused", handler)));
        }
        Ok(())
    }
}

impl ProtocolHandlers for RecordingHandlers {
    fn handle_tree_announcement(&self, from: &Peer, frame: &Frame) -> Result<(), HandlerError> {
        self.record("handle_tree_announcement", from, frame, None)
    }

    fn handle_bootstrap(&self, from: &Peer, frame: &Frame) -> Result<(), HandlerError> {
        self.record("handle_bootstrap", from, frame, None)
    }

    fn handle_bootstrap_ack(&self, from: &Peer, frame: &Frame) -> Result<(), HandlerError> {
        self.record("handle_bootstrap_ack", from, frame, None)
    }

    fn handle_setup(
        &self,
        from: &Peer,
        frame: &Frame,
        next_hop: &NextHop,
    ) -> Result<(), HandlerError> {
        self.record("handle_setup", from, frame, Some(next_hop))
    }

    fn handle_teardown(&self, from: &Peer, frame: &Frame) -> Result<NextHop, HandlerError> {
        self.record("handle_teardown", from, frame, None)?;
        Ok(self.teardown_hop.lock().unwrap().clone())
    }

    fn local_coordinates(&self) -> Coordinates {
        self.coords.clone()
    }
}

/// A router wired to scripted collaborators.
pub(super) struct TestRouter {
    pub router: Router,
    pub local_rx: PeerRx,
    pub resolver: Arc<ScriptedResolver>,
    pub handlers: Arc<RecordingHandlers>,
}

pub(super) fn make_router() -> TestRouter {
    make_router_with_config(Config::new())
}

pub(super) fn make_router_with_config(config: Config) -> TestRouter {
    let resolver = Arc::new(ScriptedResolver::default());
    let handlers = Arc::new(RecordingHandlers::new(make_coords(&[1, 4])));
    let (router, local_rx) =
        Router::with_identity(Identity::generate(), config, resolver.clone(), handlers.clone());
    TestRouter {
        router,
        local_rx,
        resolver,
        handlers,
    }
}

// ===== Router construction =====

#[test]
fn test_router_new_uses_configured_identity() {
    let identity = Identity::generate();
    let mut config = Config::new();
    config.router.identity.secret = Some(identity.secret_hex());

    let resolver = Arc::new(ScriptedResolver::default());
    let handlers = Arc::new(RecordingHandlers::new(Coordinates::root()));
    let (router, _local_rx) = Router::new(config, resolver, handlers).unwrap();

    assert_eq!(router.public_key(), identity.public_key());
    assert!(router.local_peer().is_local());
    assert_eq!(router.local_peer().public_key(), Some(&identity.public_key()));
    assert!(router.pings().is_empty());
}

#[test]
fn test_router_new_rejects_bad_secret() {
    let mut config = Config::new();
    config.router.identity.secret = Some("00".to_string());

    let resolver = Arc::new(ScriptedResolver::default());
    let handlers = Arc::new(RecordingHandlers::new(Coordinates::root()));
    let result = Router::new(config, resolver, handlers);
    assert!(matches!(result, Err(RouterError::Config(_))));
}

#[test]
fn test_new_peer_uses_configured_queue_depth() {
    let mut config = Config::new();
    config.router.peers.queue_depth = Some(2);
    let t = make_router_with_config(config);

    let (peer, _rx) = t.router.new_peer(5, None);
    assert_eq!(peer.port(), 5);
    assert!(peer.send(Frame::keepalive()));
    assert!(peer.send(Frame::keepalive()));
    assert!(!peer.send(Frame::keepalive()));
}
