//! Comet Clash Session Controller
//!
//! Runs a scripted demo match in one process: the authoritative host
//! plus two replica endpoints wired over the loopback transport.

use anyhow::Result;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use comet_clash::{
    GRACE_WINDOW_SECS, VERSION,
    core::screen::CameraProjection,
    game::{
        events::SessionEventData,
        hud::HudView,
        player::{ClientId, MemoryDirectory, PlayerDirectory, PlayerId, PlayerRecord},
        state::SessionConfig,
    },
    network::{
        context::LoopbackContext,
        registry::SessionRegistry,
        replication::LoopbackTransport,
        session::{SessionHost, SessionReplica},
    },
};

fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Comet Clash Session Controller v{}", VERSION);
    let config = SessionConfig::default();
    info!(
        "Timings: {}s start delay, {}s session, {}s end delay, {}s spawn grace",
        config.start_delay_secs, config.session_length_secs, config.end_delay_secs, GRACE_WINDOW_SECS
    );

    // Demo: run a scripted session
    demo_session(config)
}

/// Demo function to exercise the full lifecycle.
fn demo_session(config: SessionConfig) -> Result<()> {
    info!("=== Starting Demo Session ===");

    let transport = LoopbackTransport::new(256);
    let mut host = SessionHost::open(SessionRegistry::new().open(), config, transport.clone());
    let mut replicas: Vec<_> = (0..2)
        .map(|_| SessionReplica::open(SessionRegistry::new().open(), transport.subscribe()))
        .collect();

    // Two clients at the table before the match opens
    let mut directory = MemoryDirectory::new();
    let mut ctx = LoopbackContext::new(vec![ClientId::new(1), ClientId::new(2)]);
    ctx.rtt_ms = 23;

    let mut ids = Vec::new();
    for (i, name) in ["Nova", "Drift"].iter().enumerate() {
        let id = PlayerId::random();
        let owner = ClientId::new(i as u64 + 1);
        host.track_new_player(id);
        directory.insert(PlayerRecord::new(id, owner, *name, 3));
        info!(
            "Tracked {} ({}) for client {}, color {}",
            name,
            hex::encode(&id.0[..4]),
            owner.as_u64(),
            owner.color()
        );
        ids.push(id);
    }

    let camera = CameraProjection::new(5.0, 16.0 / 9.0);
    host.start(&camera, ctx.now)?;
    for replica in replicas.iter_mut() {
        replica.start(&camera);
    }

    // Run ticks at 2 Hz with a scripted series of joins and comet hits
    let mut frames = 0u32;
    let mut agreed = 0u32;
    let mut last_report_step = 0u32;

    for step in 1..=1000u32 {
        ctx.advance(0.5);

        match step {
            // t = 20.0: a third client joins mid-match
            40 => {
                let id = PlayerId::random();
                let owner = ClientId::new(3);
                host.track_new_player(id);
                directory.insert(PlayerRecord::new(id, owner, "Comet", 3));
                ctx.clients.push(owner);
                host.handle_player_joined(owner, ctx.now)?;
                info!("Comet joined late ({})", hex::encode(&id.0[..4]));
                ids.push(id);
            }
            // Comet hits: Nova grinds down, Drift racks up points
            60 => {
                directory.set_lives(&ids[0], 2);
                directory.add_score(&ids[1], 40);
            }
            90 => {
                directory.set_lives(&ids[0], 1);
                directory.add_score(&ids[2], 40);
            }
            120 => {
                directory.set_lives(&ids[0], 0);
                directory.add_score(&ids[1], 100);
                info!("Nova is out of lives");
            }
            160 => {
                directory.set_lives(&ids[2], 0);
                info!("Comet is out of lives");
            }
            _ => {}
        }

        let out = host.render_tick(&directory, &ctx)?;
        for replica in replicas.iter_mut() {
            replica.sync()?;
        }

        // Every endpoint should render the same frame from the same clock
        frames += 1;
        if replicas
            .iter()
            .all(|r| r.render_tick(&directory, &ctx) == out.hud)
        {
            agreed += 1;
        }

        for event in &out.events {
            match &event.data {
                SessionEventData::SpawningStarted => {
                    info!("Spawning ships inside {:?}", host.screen_bounds());
                }
                SessionEventData::PhaseChanged { from, to } => {
                    info!("Phase {:?} -> {:?} at {:.1}s", from, to, event.at);
                }
                SessionEventData::WinnerDecided { winner: Some(id) } => {
                    info!("Winner decided: {}", hex::encode(&id.0[..4]));
                }
                SessionEventData::WinnerDecided { winner: None } => {
                    info!("Play ended with no winner");
                }
                SessionEventData::SessionClosed => {
                    info!("Session closed at {:.1}s", event.at);
                }
            }
        }

        // Report every 10 seconds
        if step - last_report_step >= 20 {
            match &out.hud {
                HudView::SessionClock { clock, rtt_ms } => {
                    info!("t={:.1}s clock {} rtt {}ms", ctx.now, clock, rtt_ms);
                }
                other => info!("t={:.1}s hud {:?}", ctx.now, other),
            }
            last_report_step = step;
        }

        if out.session_over {
            break;
        }
    }

    // Print final results
    info!("=== Session Results ===");
    match host.winner().and_then(|id| directory.record(&id)) {
        Some(record) => info!("Winner: {} with {} points", record.nickname, record.score),
        None => info!("No winner decided"),
    }

    info!("Rendered {} frames, {} agreed across all endpoints", frames, agreed);
    if frames == agreed {
        info!("REPLICATION VERIFIED: every endpoint rendered identical frames");
    } else {
        info!("REPLICATION FAILURE: views diverged on {} frames", frames - agreed);
    }

    // Teardown: the authority surrenders its ticket first, observers follow
    let _registry = host.shutdown();
    for replica in replicas {
        let _ = replica.shutdown();
    }

    Ok(())
}
