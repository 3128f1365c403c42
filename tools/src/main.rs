//! match-runner: headless scorer for the crease scorebook.
//!
//! Usage:
//!   match-runner --seed 12345 --overs 20 --db scorebook.db
//!   match-runner --ipc-mode --data-dir ./data

use anyhow::Result;
use crease_core::{
    config::ScorerConfig,
    delivery::Delivery,
    engine::ScoringSession,
    event::{LastEvent, TransitionSignal},
    match_state::{Match, MatchSetup, MatchStatus},
    narrative::TemplateNarrator,
    rng::DeliveryRng,
    simulation::{fielders, next_selection},
    stats::Scoreboard,
    store::MatchStore,
    toss::TossDecision,
    types::{PlayerId, SelectionSlot},
};
use std::env;
use std::io::{self, BufRead, Write};

#[derive(serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum IpcCommand {
    NewMatch {
        setup: MatchSetup,
    },
    Toss {
        winner:   String,
        decision: TossDecision,
    },
    Select {
        slot:      SelectionSlot,
        player_id: PlayerId,
    },
    Ball {
        delivery: Delivery,
    },
    Finish {
        #[serde(default)]
        man_of_the_match: Option<String>,
    },
    GetState,
    Quit,
}

#[derive(serde::Serialize, Default)]
struct UiState<'a> {
    match_id: Option<&'a str>,
    version:  u64,
    status:   Option<MatchStatus>,
    signal:   Option<TransitionSignal>,
    pending_selection: Option<SelectionSlot>,
    candidates:  Vec<PlayerId>,
    scoreboard:  Option<Scoreboard>,
    target:      u32,
    result:      Option<String>,
    last_event:  Option<&'a LastEvent>,
    commentary:  Vec<&'a str>,
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let seed = parse_arg(&args, "--seed", 42u64);
    let ipc_mode = args.iter().any(|a| a == "--ipc-mode");
    let data_dir = str_arg(&args, "--data-dir").unwrap_or("./data");
    let config = ScorerConfig::load(data_dir)?;
    let overs = parse_arg(&args, "--overs", config.match_format.default_overs);
    let db = str_arg(&args, "--db")
        .unwrap_or(&config.store.db_path)
        .to_string();

    if !ipc_mode {
        println!("crease scorebook: match-runner");
        println!("  seed:      {seed}");
        println!("  overs:     {overs}");
        println!("  db:        {db}");
        println!("  data_dir:  {data_dir}");
        println!();
    }

    // Each session opens its own connection. For :memory: use a shared-cache
    // URI so they all see the same database as `anchor`.
    let db_effective = if db == ":memory:" {
        format!("file:scorebook_{seed}_{}?mode=memory&cache=shared", std::process::id())
    } else {
        db
    };
    let anchor = MatchStore::open(&db_effective)?;
    anchor.migrate()?;

    if ipc_mode {
        run_ipc_loop(&config, &db_effective)
    } else {
        let setup = MatchSetup {
            team_a: str_arg(&args, "--team-a").unwrap_or("Home XI").to_string(),
            team_b: str_arg(&args, "--team-b").unwrap_or("Away XI").to_string(),
            overs,
            ..MatchSetup::default()
        };
        let session = simulate(&config, &db_effective, setup, seed)?;
        print_summary(&session, &anchor)
    }
}

fn open_session_store(db: &str) -> Result<Box<MatchStore>> {
    let store = MatchStore::open(db)?;
    store.migrate()?;
    Ok(Box::new(store))
}

/// Score a whole seeded match through a session, exactly as a scorer would.
fn simulate(config: &ScorerConfig, db: &str, setup: MatchSetup, seed: u64) -> Result<ScoringSession> {
    let mut rng = DeliveryRng::new(seed);
    let mut session = ScoringSession::start(
        config.clone(),
        setup,
        open_session_store(db)?,
        Some(Box::new(TemplateNarrator)),
    )?;
    let toss = {
        let m = session.match_state();
        rng.toss(&m.team_a, &m.team_b)
    };
    session.resolve_toss(&toss.winner, toss.decision)?;

    loop {
        while let Some((slot, id)) = next_selection(session.match_state()) {
            session.select(slot, id)?;
        }
        let delivery = rng.next_delivery(&fielders(session.match_state()));
        match session.bowl(&delivery)? {
            TransitionSignal::MatchComplete => break,
            TransitionSignal::InningsBreak => {
                log::info!("innings break: target {}", session.match_state().target)
            }
            TransitionSignal::None => {}
        }
    }

    let motm = pick_man_of_the_match(session.match_state());
    session.finish(motm.as_deref())?;
    Ok(session)
}

/// Runs plus 25 per wicket, highest first.
fn pick_man_of_the_match(m: &Match) -> Option<String> {
    m.motm_candidates()
        .into_iter()
        .max_by_key(|c| {
            let runs = c.batting.map_or(0, |(runs, _)| runs);
            let wickets = c.bowling.map_or(0, |(wickets, _)| wickets);
            runs + 25 * wickets
        })
        .map(|c| c.name)
}

fn run_ipc_loop(config: &ScorerConfig, db: &str) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut handle = stdin.lock();
    let mut buffer = String::new();
    let mut session: Option<ScoringSession> = None;

    loop {
        buffer.clear();
        let bytes_read = handle.read_line(&mut buffer)?;
        if bytes_read == 0 {
            break; // EOF
        }

        let cmd: IpcCommand = match serde_json::from_str(&buffer) {
            Ok(c) => c,
            Err(e) => {
                let err_json = serde_json::json!({ "error": e.to_string() });
                writeln!(stdout, "{}", err_json)?;
                stdout.flush()?;
                continue;
            }
        };
        if matches!(cmd, IpcCommand::Quit) {
            break;
        }

        match handle_command(config, db, &mut session, cmd) {
            Ok(signal) => {
                let state = build_ui_state(session.as_ref(), signal);
                writeln!(stdout, "{}", serde_json::to_string(&state)?)?;
            }
            Err(e) => {
                let err_json = serde_json::json!({ "error": e.to_string() });
                writeln!(stdout, "{}", err_json)?;
            }
        }
        stdout.flush()?;
    }
    Ok(())
}

fn handle_command(
    config: &ScorerConfig,
    db: &str,
    session: &mut Option<ScoringSession>,
    cmd: IpcCommand,
) -> Result<Option<TransitionSignal>> {
    if let IpcCommand::NewMatch { setup } = cmd {
        if let Some(previous) = session.take() {
            if previous.match_state().status != MatchStatus::Complete {
                previous.abandon();
            }
        }
        *session = Some(ScoringSession::start(
            config.clone(),
            setup,
            open_session_store(db)?,
            Some(Box::new(TemplateNarrator)),
        )?);
        return Ok(None);
    }

    let Some(active) = session.as_mut() else {
        anyhow::bail!("no match in progress; send new_match first");
    };
    match cmd {
        IpcCommand::Toss { winner, decision } => active.resolve_toss(&winner, decision)?,
        IpcCommand::Select { slot, player_id } => active.select(slot, player_id)?,
        IpcCommand::Ball { delivery } => return Ok(Some(active.bowl(&delivery)?)),
        IpcCommand::Finish { man_of_the_match } => active.finish(man_of_the_match.as_deref())?,
        IpcCommand::GetState => {}
        IpcCommand::NewMatch { .. } | IpcCommand::Quit => {
            log::warn!("command already handled");
        }
    }
    Ok(None)
}

fn build_ui_state(session: Option<&ScoringSession>, signal: Option<TransitionSignal>) -> UiState<'_> {
    let Some(session) = session else {
        return UiState::default();
    };
    let m = session.match_state();
    let pending = m.pending_selection();
    let candidates = match pending {
        Some(SelectionSlot::Bowler) => m.available_bowlers(),
        Some(slot) => m.available_batsmen(slot),
        None => Vec::new(),
    };
    UiState {
        match_id: Some(m.id.as_str()),
        version: m.version,
        status: Some(m.status),
        signal,
        pending_selection: pending,
        candidates,
        scoreboard: Scoreboard::from_match(m),
        target: m.target,
        result: (m.status == MatchStatus::Complete).then(|| m.result().to_string()),
        last_event: m.last_event.as_ref(),
        commentary: session.commentary().collect(),
    }
}

fn print_summary(session: &ScoringSession, store: &MatchStore) -> Result<()> {
    let m = session.match_state();
    println!("=== MATCH SUMMARY ===");
    println!("  match_id:    {}", m.id);
    for inning in &m.innings {
        println!(
            "  {:<12} {}/{} ({} ov, extras {})",
            inning.batting_team,
            inning.score,
            inning.wickets,
            inning.over_marker(),
            inning.extras.total()
        );
    }
    println!("  result:      {}", m.result());
    if let Some(motm) = &m.man_of_the_match {
        println!("  motm:        {} ({})", motm.name, motm.team_name);
    }
    println!("  balls:       {}", store.event_count(&m.id, "ball_bowled")?);
    println!("  completed:   {}", store.completed_match_count()?);
    println!("  profiles:    {}", store.player_profiles()?.len());

    println!();
    println!("=== COMMENTARY (latest first) ===");
    for line in session.commentary() {
        println!("  {line}");
    }
    match session.summarize() {
        Ok(summary) => {
            println!();
            println!("=== SUMMARY ===");
            println!("{summary}");
        }
        Err(e) => log::warn!("no summary: {e}"),
    }
    Ok(())
}

fn str_arg<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}
