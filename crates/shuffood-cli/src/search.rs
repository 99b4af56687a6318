//! `search` and `shuffle` command handlers.

use std::sync::Arc;

use shuffood_core::{load_cuisine_table, AppConfig, Candidate, CategoryMatcher, Coordinate, QueryFilters};
use shuffood_places::PlacesClient;
use shuffood_session::{
    SearchOutcome, SelectionError, Selector, Session, SessionError, ShuffleEvent,
};

use crate::{OriginArgs, QueryArgs};

/// The location the user supplied on the command line, if any.
pub(crate) fn provided_origin(args: &OriginArgs) -> anyhow::Result<Coordinate> {
    match (args.lat, args.lng) {
        (Some(lat), Some(lng)) => Ok(Coordinate::new(lat, lng)?),
        _ => Err(anyhow::anyhow!("no location supplied")),
    }
}

pub(crate) fn filters_from_args(config: &AppConfig, args: &QueryArgs) -> anyhow::Result<QueryFilters> {
    let radius = args.radius.unwrap_or(config.default_radius_miles);
    Ok(QueryFilters::new(radius, args.min_rating, &args.exclude)?)
}

pub(crate) fn fmt_rating(candidate: &Candidate) -> String {
    if candidate.is_rated() {
        format!("{:.1}", candidate.rating)
    } else {
        "-".to_string()
    }
}

fn fmt_name(name: &str) -> String {
    if name.chars().count() > 32 {
        format!("{}...", name.chars().take(32).collect::<String>())
    } else {
        name.to_string()
    }
}

/// Builds a session for `args` and runs one search.
///
/// Returns `None` after printing the error when the search failed in a way
/// the user can act on.
async fn searched_session(
    config: &AppConfig,
    args: &QueryArgs,
) -> anyhow::Result<Option<Session<PlacesClient>>> {
    let matcher: Arc<dyn CategoryMatcher> = Arc::new(load_cuisine_table(config)?);
    let client = PlacesClient::from_config(config)?.with_matcher(Arc::clone(&matcher));
    let filters = filters_from_args(config, args)?;

    let mut session = Session::new(client, matcher, Selector::from_config(config), filters);
    session.resolve_origin(provided_origin(&args.origin), config.fallback_origin);

    match session.search().await {
        Ok(SearchOutcome::Applied { .. } | SearchOutcome::Superseded) => Ok(Some(session)),
        Err(SessionError::Places(e)) => {
            eprintln!("search failed: {e}");
            if e.is_retryable() {
                eprintln!("this looks temporary; try again in a moment");
            }
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}

fn print_candidates(session: &Session<PlacesClient>) {
    let (shown, total) = session.counts();
    let radius = session.filters().radius_miles();
    match session.origin() {
        Some(origin) => println!("Found {shown} of {total} restaurants within {radius} mi of {origin}"),
        None => println!("Found {shown} of {total} restaurants"),
    }
    if shown == 0 {
        return;
    }

    println!();
    println!("{:<30}{:<36}{:>8}{:>9}", "ID", "NAME", "RATING", "MILES");
    for c in session.filtered() {
        println!(
            "{:<30}{:<36}{:>8}{:>9.2}",
            c.id,
            fmt_name(&c.name),
            fmt_rating(c),
            c.distance_miles
        );
    }
}

fn print_pick(candidate: &Candidate, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(candidate)?);
    } else {
        println!();
        println!("You're going to: {}", candidate.name);
        if !candidate.address.is_empty() {
            println!("  {}", candidate.address);
        }
        println!(
            "  rating {}, {:.2} mi away",
            fmt_rating(candidate),
            candidate.distance_miles
        );
    }
    Ok(())
}

/// List candidates around the origin, or settle on one by id.
///
/// # Errors
///
/// Returns an error if config or filters are invalid, the places client
/// cannot be built, or `pick` names a candidate not in the results.
pub(crate) async fn run_search(
    config: &AppConfig,
    args: &QueryArgs,
    pick: Option<&str>,
) -> anyhow::Result<()> {
    let Some(mut session) = searched_session(config, args).await? else {
        return Ok(());
    };

    if let Some(id) = pick {
        let chosen = session.pick(id)?;
        return print_pick(&chosen, args.json);
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(session.filtered())?);
    } else {
        print_candidates(&session);
    }
    Ok(())
}

/// Search, then animate a shuffle in the terminal until it settles.
///
/// Ctrl-C stops the spin; nothing is picked in that case.
///
/// # Errors
///
/// Returns an error if config or filters are invalid or the places client
/// cannot be built.
pub(crate) async fn run_shuffle(config: &AppConfig, args: &QueryArgs) -> anyhow::Result<()> {
    let Some(mut session) = searched_session(config, args).await? else {
        return Ok(());
    };

    let (shown, total) = session.counts();
    if !args.json {
        println!("Found {shown} of {total} restaurants");
    }

    match session.shuffle() {
        Ok(()) => {}
        Err(SessionError::Selection(SelectionError::EmptyCandidateSet)) => {
            println!("No restaurants match these filters; try a wider radius or fewer exclusions.");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    }

    loop {
        tokio::select! {
            event = session.next_event() => match event {
                Some(ShuffleEvent::Tick { tick, pick }) => {
                    if !args.json {
                        println!("  [{tick:>2}] {}", pick.name);
                    }
                }
                Some(ShuffleEvent::Settled(pick)) => return print_pick(&pick, args.json),
                None => return Ok(()),
            },
            _ = tokio::signal::ctrl_c() => {
                session.cancel_shuffle();
                eprintln!("shuffle cancelled");
                return Ok(());
            }
        }
    }
}
