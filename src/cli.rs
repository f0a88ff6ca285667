//! Interactive console — the headless stand-in for the original control
//! window (mode switch, pad simulator, status readout).

use anyhow::Result;
use rustyline::DefaultEditor;

use crate::bridge::Bridge;
use crate::config::Mode;
use crate::transport::{self, MidiBackend};

pub async fn run_repl(bridge: &Bridge, backend: &dyn MidiBackend) -> Result<()> {
    let mut rl = DefaultEditor::new()?;
    println!("lpx-gw console - 'help' lists commands");

    loop {
        let readline = rl.readline("lpx> ");
        match readline {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(line);
                if !dispatch(bridge, backend, line) {
                    break;
                }
            }
            Err(_) => break,
        }
    }

    Ok(())
}

/// Returns `false` when the console should exit.
fn dispatch(bridge: &Bridge, backend: &dyn MidiBackend, line: &str) -> bool {
    let mut parts = line.split_whitespace();
    match parts.next() {
        Some("exit") | Some("quit") => return false,
        Some("help") => print_help(),
        Some("status") => {
            println!(
                "mode: {}  running: {}",
                bridge.mode(),
                bridge.is_running()
            );
        }
        Some("mode") => match parts.next() {
            Some("program") => bridge.set_mode(Mode::Program),
            Some("native") => bridge.set_mode(Mode::Native),
            _ => println!("usage: mode <program|native>"),
        },
        Some("pad") => {
            let pad = parts.next().and_then(|v| v.parse::<u8>().ok());
            let velocity = parts
                .next()
                .and_then(|v| v.parse::<u8>().ok())
                .unwrap_or(127);
            match pad {
                Some(pad) if pad < 128 => bridge.press_pad(pad, velocity),
                _ => println!("usage: pad <0-127> [velocity]"),
            }
        }
        Some("ports") => transport::list_ports_formatted(backend),
        Some(other) => println!("unknown command: {}", other),
        None => {}
    }
    true
}

fn print_help() {
    println!("commands:");
    println!("  status                  show mode and session state");
    println!("  mode <program|native>   switch the controller mode");
    println!("  pad <0-127> [velocity]  simulate a pad press");
    println!("  ports                   list MIDI ports");
    println!("  quit                    stop the gateway and exit");
}
