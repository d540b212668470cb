use sim_engine::{
    ConfigError, DualModeAgentSim, LoopConfig, Mode, ModeControl, ModeIndicator, NetworkFlowSim,
    SeekingAgentSim, SharedModeButton, SharedText, StillFrame, TextSink, Widget, WidgetDeck,
};
use thiserror::Error;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::{self, ShowcaseConfig, ShowcaseConfigError};

#[derive(Debug, Error)]
pub(crate) enum StartupError {
    #[error(transparent)]
    Config(#[from] ShowcaseConfigError),
    #[error("failed to build simulation: {0}")]
    Simulation(#[from] ConfigError),
}

pub(crate) struct AppWiring {
    pub(crate) config: LoopConfig,
    pub(crate) deck: WidgetDeck,
}

pub(crate) fn build_app() -> Result<AppWiring, StartupError> {
    init_tracing();
    info!("=== Simulation Showcase Startup ===");

    let showcase = config::load_from_env()?;
    let deck = build_deck(&showcase)?;
    info!(
        widgets = deck.len(),
        reduced_motion = showcase.reduced_motion,
        "widgets_ready"
    );

    Ok(AppWiring {
        config: showcase.window.to_loop_config(),
        deck,
    })
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_names(true)
        .compact()
        .init();
}

/// Spark, orbit and flow, in cycling order.
pub(crate) fn build_deck(config: &ShowcaseConfig) -> Result<WidgetDeck, ConfigError> {
    let reduced = config.reduced_motion;

    let spark = if reduced {
        Widget::create(Box::new(StillFrame::spark()))
    } else {
        let score = SharedText::default();
        let sim = SeekingAgentSim::spark(config.spark.clone(), Some(text_sink(&score)))?;
        Widget::create(Box::new(sim)).with_caption("Score:", score)
    };

    let (mut indicator, mode_label, _buttons) = orbit_indicator();
    let orbit = if reduced {
        indicator.show_static();
        Widget::create(Box::new(StillFrame::orbit())).with_caption("Mode:", mode_label)
    } else {
        let score = SharedText::default();
        let sim = DualModeAgentSim::orbit(config.orbit.clone(), Some(text_sink(&score)), indicator)?;
        Widget::create(Box::new(sim))
            .with_caption("Score:", score)
            .with_caption("Mode:", mode_label)
    };

    let flow = NetworkFlowSim::new(config.flow.clone(), reduced)?;

    Ok(WidgetDeck::new(vec![spark, orbit, Widget::create(Box::new(flow))]))
}

/// Mode label plus one button per mode, all observable through the returned handles.
fn orbit_indicator() -> (ModeIndicator, SharedText, [SharedModeButton; 2]) {
    let label = SharedText::default();
    let buttons = [
        SharedModeButton::new(Some(Mode::Auto)),
        SharedModeButton::new(Some(Mode::Manual)),
    ];
    let controls = buttons
        .iter()
        .map(|button| Box::new(button.clone()) as Box<dyn ModeControl>)
        .collect();
    let indicator = ModeIndicator::new(Some(text_sink(&label)), controls);
    (indicator, label, buttons)
}

fn text_sink(text: &SharedText) -> Box<dyn TextSink> {
    Box::new(text.clone())
}
