use anyhow::Result;
use std::io::{self, BufRead, Write};

use courtside::logging::{log, obj, v_str, Domain, Level};
use courtside::model::League;
use courtside::render::{BarChart, BubbleChart, ChartRenderer};
use courtside::session::{now_ms, Config, Outcome, Session};

const INTRO: &str = "\
courtside — explore Olympic and FIBA men's basketball history
commands:
  olympics | fiba   select a dataset
  next (or enter)   step one edition forward
  back              step one edition back
  goto <n>          jump to edition n
  home              back to the selection screen
  quit";

fn report(result: Result<Outcome>) {
    match result {
        Ok(Outcome::Moved(_)) => {}
        Ok(Outcome::AtBound) => println!("(no edition there — at a boundary)"),
        Ok(Outcome::Cooldown) => println!("(hold on — still drawing the last view)"),
        Err(err) => {
            log(
                Level::Error,
                Domain::Dataset,
                "load_failed",
                obj(&[("error", v_str(&format!("{:#}", err)))]),
            );
            println!("load failed, view unchanged: {:#}", err);
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cfg = Config::from_env();
    log(Level::Info, Domain::System, "start", obj(&[("version", v_str(env!("CARGO_PKG_VERSION")))]));

    let renderers: Vec<Box<dyn ChartRenderer>> = vec![
        Box::new(BubbleChart::new(io::stdout())),
        Box::new(BarChart::new(io::stdout())),
    ];
    let mut session = Session::new(cfg, renderers);

    println!("{}", INTRO);
    let stdin = io::stdin();
    loop {
        print!("> ");
        io::stdout().flush()?;
        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let input = line.trim().to_lowercase();
        match input.as_str() {
            "olympics" => report(session.select(League::Olympics, now_ms()).await),
            "fiba" => report(session.select(League::Fiba, now_ms()).await),
            "next" | "" => report(session.advance(0, now_ms()).await),
            "back" => report(session.retreat(now_ms()).await),
            "home" => {
                session.home();
                println!("{}", INTRO);
            }
            "quit" | "exit" => break,
            other => match other.strip_prefix("goto ").and_then(|n| n.parse::<u32>().ok()) {
                Some(edition) if edition > 0 => {
                    report(session.advance(edition, now_ms()).await)
                }
                _ => println!("unknown command: {}", other),
            },
        }
    }

    log(Level::Info, Domain::System, "stop", obj(&[]));
    Ok(())
}
