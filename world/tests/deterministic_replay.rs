use world_of_bits_core::{CellId, Command, Event, GameStatus, START_ORIGIN};
use world_of_bits_world::{self as world, generation::base_token, query, special_cells_near, World};

const COLLECTED_TOKENS: usize = 6;

#[test]
fn deterministic_replay_produces_identical_outcomes() {
    let first = replay(scripted_commands());
    let second = replay(scripted_commands());

    assert_eq!(first.world, second.world, "world diverged between runs");
    assert_eq!(first.events, second.events, "event log diverged between runs");
}

#[test]
fn scripted_collection_cashes_in_every_token() {
    let expected: u64 = token_cells()
        .iter()
        .filter_map(|id| base_token(*id))
        .map(|token| token.value())
        .sum();

    let outcome = replay(scripted_commands());

    assert_eq!(query::score(&outcome.world), expected);
    assert_eq!(query::best_score(&outcome.world), expected);
    assert_eq!(query::held(&outcome.world), None);
    assert_eq!(query::status(&outcome.world), GameStatus::Playing);

    for id in token_cells() {
        assert!(query::cell(&outcome.world, id).is_empty(), "{id} still holds a token");
    }

    let craft = query::craft_cell(&outcome.world);
    let score = query::score_cell(&outcome.world);
    assert!(query::cell(&outcome.world, craft).is_empty());
    assert!(query::cell(&outcome.world, score).is_empty());

    let pickups = outcome
        .events
        .iter()
        .filter(|event| matches!(event, Event::TokenPickedUp { .. }))
        .count();
    assert_eq!(pickups, COLLECTED_TOKENS + 1);

    let combines = outcome
        .events
        .iter()
        .filter(|event| matches!(event, Event::TokensCombined { .. }))
        .count();
    assert_eq!(combines, COLLECTED_TOKENS - 1);
}

struct ReplayOutcome {
    world: World,
    events: Vec<Event>,
}

fn replay(commands: Vec<Command>) -> ReplayOutcome {
    let mut world = World::new();
    let mut log = Vec::new();

    for command in commands {
        let mut events = Vec::new();
        world::apply(&mut world, command, &mut events);
        log.extend(events);
    }

    ReplayOutcome { world, events: log }
}

fn token_cells() -> Vec<CellId> {
    (0..)
        .map(|x| CellId::new(x, -3_000))
        .filter(|id| base_token(*id).is_some())
        .take(COLLECTED_TOKENS)
        .collect()
}

fn scripted_commands() -> Vec<Command> {
    let start = CellId::containing(START_ORIGIN);
    let (craft, score) = special_cells_near(start);
    let home = Command::MoveTo {
        point: START_ORIGIN,
        heading_deg: Some(0.0),
    };

    let mut commands = Vec::new();
    for cell in token_cells() {
        commands.push(Command::MoveTo {
            point: cell.center(),
            heading_deg: Some(180.0),
        });
        commands.push(Command::ClickCell { cell });
        commands.push(home.clone());
        commands.push(Command::ClickCell { cell: craft });
    }
    commands.push(Command::ClickCell { cell: craft });
    commands.push(Command::ClickCell { cell: score });
    commands
}
