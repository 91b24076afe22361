use std::sync::Arc;

use rand::{Rng, SeedableRng, rngs::StdRng};
use tracing::info;

use crate::{
    config::AppConfig,
    state::{
        engine::MatchSetup,
        match_state::{MatchNames, Side},
    },
};

/// Draws servers uniformly and team names from the configured catalogue.
pub struct CatalogSetup {
    config: Arc<AppConfig>,
    rng: StdRng,
    last_names: Option<usize>,
}

impl CatalogSetup {
    /// Setup seeded from the operating system.
    pub fn new(config: Arc<AppConfig>) -> Self {
        Self::with_rng(config, StdRng::from_os_rng())
    }

    /// Setup using a caller-provided generator.
    pub fn with_rng(config: Arc<AppConfig>, rng: StdRng) -> Self {
        Self {
            config,
            rng,
            last_names: None,
        }
    }
}

impl MatchSetup for CatalogSetup {
    fn pick_server(&mut self) -> Side {
        if self.rng.random_bool(0.5) {
            Side::A
        } else {
            Side::B
        }
    }

    fn pick_names(&mut self) -> MatchNames {
        let (index, names) = self.config.pick_names(&mut self.rng, self.last_names);
        self.last_names = Some(index);
        info!(theme = %names.theme, a = %names.name_a, b = %names.name_b, "drew team names");
        names
    }
}
