#![allow(dead_code)]

use agegate_crypto::public_key_to_hex;
use agegate_nullables::{NullClock, NullCookieJar, NullFrame, NullSignals, NullSurface, TokenMinter, TEST_ISSUER};
use agegate_store::SiteContext;
use agegate_surface::{PresentationSurface, Viewport};
use agegate_types::{Clock, VerificationIdentity};
use agegate_verification::{
    Deps, GateConfig, HostCapabilities, OrchestrationContext, Orchestrator, ValidateOptions,
    AttemptResult,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

pub const HOST: &str = "shop.example.com";
pub const SERVICE_ORIGIN: &str = "https://verify.agegate.example";
pub const NOW: u64 = 1_700_000_000;
pub const COOKIE: &str = "agegate_session";

pub struct Harness {
    pub clock: Arc<NullClock>,
    pub jar: Arc<NullCookieJar>,
    pub surface: Arc<NullSurface>,
    pub frame: Arc<NullFrame>,
    pub signals: Arc<NullSignals>,
    pub minter: TokenMinter,
    pub context: Arc<OrchestrationContext>,
    pub config: Arc<GateConfig>,
    pub viewport: Viewport,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_config(|_| {})
    }

    pub fn with_config(f: impl FnOnce(&mut GateConfig)) -> Self {
        let clock = Arc::new(NullClock::new(NOW));
        let minter = TokenMinter::new([9u8; 32]);
        let mut config = GateConfig {
            public_key: public_key_to_hex(&minter.public_key()),
            issuer: TEST_ISSUER.to_string(),
            ..GateConfig::default()
        };
        f(&mut config);
        Self {
            jar: Arc::new(NullCookieJar::new(HOST, clock.clone())),
            clock,
            surface: Arc::new(NullSurface::new()),
            frame: Arc::new(NullFrame::new()),
            signals: Arc::new(NullSignals::desktop()),
            minter,
            context: OrchestrationContext::new(),
            config: Arc::new(config),
            viewport: Viewport::default(),
        }
    }

    pub fn deps(&self) -> Deps {
        Deps {
            surface: self.surface.clone(),
            frame: self.frame.clone(),
            cookies: self.jar.clone(),
            site: SiteContext::new(HOST, true),
            clock: self.clock.clone(),
            signals: self.signals.clone(),
            viewport: self.viewport.clone(),
            capabilities: HostCapabilities::default(),
        }
    }

    pub fn orchestrator(&self) -> Arc<Orchestrator> {
        self.orchestrator_for("asset-1", "ref-1")
    }

    pub fn orchestrator_for(&self, asset: &str, reference: &str) -> Arc<Orchestrator> {
        Orchestrator::new(
            identity(asset, reference),
            self.deps(),
            self.config.clone(),
            self.context.clone(),
        )
        .unwrap()
    }

    /// An of-age token bound to the site's registrable domain.
    pub fn token(&self) -> String {
        self.minter.of_age_token("example.com", self.clock.now())
    }

    pub fn token_with(&self, domain: Option<&str>, is_of_age: bool) -> String {
        let claims = self.minter.claims(domain, is_of_age, self.clock.now(), 3600);
        self.minter.mint(&claims)
    }

    pub fn cached(&self) -> Option<String> {
        self.jar
            .cookie(COOKIE, Some(".example.com"))
            .map(|c| c.value)
    }

    pub fn seed_session(&self, token: &str) {
        self.jar.seed(
            agegate_store::Cookie::new(COOKIE, token).with_domain(Some(".example.com".into())),
        );
    }
}

pub fn identity(asset: &str, reference: &str) -> VerificationIdentity {
    VerificationIdentity::new(asset, reference, None).unwrap()
}

pub fn success(token: &str) -> String {
    serde_json::json!({ "type": "success", "data": { "token": token } }).to_string()
}

pub fn message(kind: &str, data: serde_json::Value) -> String {
    serde_json::json!({ "type": kind, "data": data }).to_string()
}

/// Yield until the surface has been opened.
pub async fn opened(surface: &NullSurface) {
    for _ in 0..1_000 {
        if surface.is_open() {
            return;
        }
        tokio::task::yield_now().await;
    }
    panic!("surface never opened");
}

/// Run `validate_session` and deliver `raw` from the service origin once the
/// surface is up.
pub async fn drive(
    orchestrator: &Orchestrator,
    surface: &NullSurface,
    options: ValidateOptions,
    raw: &str,
) -> AttemptResult {
    let (result, _) = tokio::join!(orchestrator.validate_session(options), async {
        opened(surface).await;
        assert!(orchestrator.handle_message(SERVICE_ORIGIN, raw));
    });
    result
}

#[derive(Clone, Default)]
pub struct Counter(Arc<AtomicUsize>);

impl Counter {
    pub fn hit(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }

    pub fn get(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}
