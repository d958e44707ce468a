use std::io::{self, BufRead, Write};

use anyhow::Result;

use recall_lib::quiz::QuestionKind;

use crate::app::App;
use crate::commands::{coverage, stats};

/// Interactive menu loop. Every path back out of here goes through a save.
pub fn run(mut app: App) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new()?;

    loop {
        let burst = app.controller.session().burst_mode;
        println!("\nWhat next?");
        println!("1: Ask a root question");
        println!("2: Ask a vocabulary question");
        println!("3: Show statistics");
        println!("4: Toggle burst mode (currently {})", on_off(burst));
        println!("s: Simulate daily coverage");
        println!("c: Configure daily quotas");
        println!("q: Save and quit");

        let choice = prompt("Choose an option (1/2/3/4/s/c/q): ")?;
        match choice.trim().to_lowercase().as_str() {
            "1" => {
                runtime.block_on(app.controller.ask(QuestionKind::Root));
            }
            "2" => {
                runtime.block_on(app.controller.ask(QuestionKind::Vocabulary));
            }
            "3" => stats::show(app.controller.items(), app.use_color),
            "4" => {
                let burst = app.controller.toggle_burst_mode();
                println!("\nBurst mode is now {}.", on_off(burst));
            }
            "s" => coverage::run(
                app.controller.items(),
                app.controller.session(),
                app.use_color,
            ),
            "c" => configure(&mut app)?,
            "q" => {
                app.save()?;
                println!("Progress saved. Bye!");
                break;
            }
            _ => println!("\nUnrecognized option, try again."),
        }
    }

    Ok(())
}

fn on_off(value: bool) -> &'static str {
    if value {
        "on"
    } else {
        "off"
    }
}

/// Read one menu line; EOF behaves like quit
fn prompt(message: &str) -> Result<String> {
    print!("{}", message);
    io::stdout().flush()?;

    let mut line = String::new();
    let read = io::stdin().lock().read_line(&mut line)?;
    if read == 0 {
        return Ok("q".to_string());
    }
    Ok(line)
}

/// Update the daily quotas. Invalid or non-numeric input reports the
/// rejection and keeps the prior value; it never aborts the loop.
fn configure(app: &mut App) -> Result<()> {
    println!("\n=== Configure daily quotas ===");

    let current = app.controller.session().daily_max_quota;
    let input = prompt(&format!(
        "Daily question cap (currently {}, Enter keeps it): ",
        current
    ))?;
    let input = input.trim();
    if !input.is_empty() {
        match input.parse::<u32>() {
            Ok(0) => println!("The daily cap must be positive; keeping {}.", current),
            Ok(quota) => app.controller.set_daily_max_quota(quota),
            Err(_) => println!("Not a number; keeping {}.", current),
        }
    }

    let current = app.controller.session().daily_new_quota;
    let input = prompt(&format!(
        "New words per day (currently {}, Enter keeps it): ",
        current
    ))?;
    let input = input.trim();
    if !input.is_empty() {
        match input.parse::<u32>() {
            Ok(quota) => app.controller.set_daily_new_quota(quota),
            Err(_) => println!("Not a number; keeping {}.", current),
        }
    }

    let session = app.controller.session();
    println!(
        "Configured: daily cap = {}, new words per day = {}",
        session.daily_max_quota, session.daily_new_quota
    );
    Ok(())
}
