// SPDX-License-Identifier: MPL-2.0

//! Interactive console for the kettle model.
//!
//! Reads one command per line from stdin and prints state changes and
//! notices as they happen.
//!
//! # Usage
//!
//! ```bash
//! cargo run --example console
//! RUST_LOG=debug cargo run --example console
//! ```
//!
//! # Commands
//!
//! - `plug`: plug in / unplug
//! - `power`: switch heating on / off
//! - `water <amount>`: add water (0.0 empties the kettle)
//! - `stop`: switch heating off
//! - `reset`: empty the kettle
//! - `status`: print the current state
//! - `quit`: exit

use kettle_lib::Kettle;
use kettle_lib::event::KettleEvent;
use tokio::io::{AsyncBufReadExt, BufReader};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let kettle = Kettle::new()?;
    let mut events = kettle.subscribe();

    tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            let phase = event.phase();
            match event {
                KettleEvent::Notice(error) => println!("! {}", error.notice()),
                KettleEvent::StateChanged { new_state, .. } => {
                    println!(
                        "  [{}] water {} | {} | plugged in: {}",
                        new_state.phase(),
                        new_state.water_level,
                        new_state.temperature,
                        new_state.is_plugged_in
                    );
                }
                KettleEvent::Boiled { temperature } => {
                    if let Some(phase) = phase {
                        println!("* [{phase}] The kettle has boiled at {temperature}.");
                    }
                }
                KettleEvent::CooledDown { .. } => println!("* The water is at room temperature."),
            }
        }
    });

    print_help();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let mut words = line.split_whitespace();
        match (words.next(), words.next()) {
            (Some("plug"), None) => kettle.toggle_plug(),
            (Some("power"), None) => {
                // Rejections are printed by the event task.
                let _ = kettle.toggle_power();
            }
            (Some("water"), Some(amount)) => match amount.parse::<f64>() {
                Ok(amount) => {
                    let _ = kettle.add_water(amount);
                }
                Err(e) => println!("! cannot parse {amount:?}: {e}"),
            },
            (Some("stop"), None) => {
                if !kettle.stop() {
                    println!("  the kettle is not heating");
                }
            }
            (Some("reset"), None) => kettle.reset(),
            (Some("status"), None) => println!("{}", kettle.state()),
            (Some("quit"), None) => break,
            (None, _) => {}
            _ => print_help(),
        }
    }

    Ok(())
}

fn print_help() {
    println!("Commands: plug | power | water <amount> | stop | reset | status | quit");
}
