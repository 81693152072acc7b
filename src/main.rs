//! Headless encounter runner
//!
//! Loads a scene (RON or JSON) from the first argument, or plays the built-in
//! corridor scene, and runs it until the player falls or the frame limit is
//! reached. Set `RUST_LOG=debug` to follow every phase change.

use stalker::prelude::*;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let scene = match std::env::args().nth(1) {
        Some(path) => EncounterScene::load(&path)?,
        None => EncounterScene::demo(),
    };
    log::info!("Running scene '{}' (v{})", scene.name, scene.version);

    let grid = scene.build_grid()?;
    let mut player = Player::new(scene.player_start, scene.player_health);
    let mut simulation = Simulation::new(scene.simulation.clone());

    for (index, spawn) in scene.agents.iter().enumerate() {
        let name = spawn
            .name
            .clone()
            .unwrap_or_else(|| format!("agent-{index}"));
        let transform = Transform::from_position(spawn.position).with_yaw(spawn.yaw);
        if let Err(e) = simulation.spawn_agent(
            name.as_str(),
            transform,
            scene.agent_config(spawn),
            &grid,
            &player,
        ) {
            log::warn!("{name}: {e}");
        }
    }

    if simulation.agent_count() == 0 {
        log::warn!("No agent could reach the player");
        return Ok(());
    }

    let dt = scene.simulation.fixed_timestep;
    let max_frames = u64::from(scene.simulation.max_frames);
    let mut strikes = 0u32;

    while simulation.frame_count() < max_frames && player.is_alive() {
        simulation.frame(&grid, &mut player, dt);

        for event in simulation.events().iter() {
            match event {
                GameEvent::AgentAlerted { entity } => log::info!("{entity:?} noticed the player"),
                GameEvent::TargetStruck { entity, amount } => {
                    strikes += 1;
                    log::info!(
                        "{entity:?} struck for {amount}, player health {}",
                        player.health()
                    );
                }
                GameEvent::PathUnavailable { entity } => log::warn!("{entity:?} lost the path"),
                GameEvent::PhaseChanged { entity, from, to } => {
                    let clip = simulation.signal(*entity).map_or("none", AnimationSignal::clip);
                    log::debug!("{entity:?}: {from} -> {to}, playing '{clip}'");
                }
                _ => {}
            }
        }
    }

    // Events from the final frame haven't been read yet
    simulation.events_mut().swap();
    strikes += simulation
        .events()
        .iter()
        .filter(|e| matches!(e, GameEvent::TargetStruck { .. }))
        .count() as u32;

    let elapsed = simulation.frame_count() as f32 * dt;
    if player.is_alive() {
        log::info!(
            "Player survived {elapsed:.1}s with {} health after {strikes} strikes",
            player.health()
        );
    } else {
        log::info!("Player fell after {elapsed:.1}s and {strikes} strikes");
    }

    Ok(())
}
