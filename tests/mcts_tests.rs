//! MCTS integration tests on real Connect-Four positions.

use std::time::{Duration, Instant};

use connect_mcts::mcts::{
    rollout, MCTSConfig, MCTSSearch, MCTSTree, NodeId, SelectionPolicy, SimulationPolicy,
};
use connect_mcts::{Game, GameConfig, GameResult, GameRng, Player, SearchError, UNEXPLORED_WEIGHT};

fn position(moves: &[usize]) -> Game {
    let mut game = Game::default();
    for &col in moves {
        game.drop(col).unwrap();
    }
    game
}

/// Player 1 to move with three in a row on the bottom; column 3 wins.
fn immediate_win() -> Game {
    position(&[0, 0, 1, 1, 2, 2])
}

// =============================================================================
// Reward Perspective Tests
// =============================================================================

#[test]
fn test_root_children_credit_player_to_move() {
    let game = position(&[3, 2]);
    let mut search = MCTSSearch::new(MCTSConfig::default());
    search.search_iterations(&game, 1000).unwrap();

    let stats = search.stats();
    let root_stats = search.root_stats();
    let visits: u32 = root_stats.iter().map(|s| s.visits).sum();
    let reward: f64 = root_stats.iter().map(|s| s.total_reward).sum();

    // Every playout passes through exactly one root child, credited to
    // player 1 (the player to move at the root).
    assert_eq!(visits, stats.iterations);
    assert_eq!(reward, stats.wins as f64 + 0.5 * stats.draws as f64);
    for (_, node) in search.tree().iter().skip(1).filter(|(_, n)| n.depth == 1) {
        assert_eq!(node.mover, Player::One);
    }
}

#[test]
fn test_rewards_alternate_between_levels() {
    let game = Game::new(GameConfig::new(5, 4, 3)).unwrap();
    let mut search = MCTSSearch::new(MCTSConfig::default());
    search.search_iterations(&game, 2000).unwrap();

    let tree = search.tree();
    for (id, node) in tree.iter() {
        if id == tree.root() || node.children.is_empty() {
            continue;
        }

        // A child's reward is its mover's, the parent's mover is the
        // opponent: parent reward = its own rollout + child losses.
        let from_children: f64 = node
            .children
            .iter()
            .map(|edge| {
                let child = tree.get(edge.child);
                assert_ne!(child.mover, node.mover);
                child.visits as f64 - child.total_reward
            })
            .sum();
        let own = node.total_reward - from_children;
        assert!((0.0..=1.0).contains(&own), "node {id} own rollout reward {own}");
    }
}

#[test]
fn test_winning_move_has_full_weight() {
    let game = immediate_win();
    let mut search = MCTSSearch::new(MCTSConfig::default());
    search.search_iterations(&game, 500).unwrap();

    let winning = search.tree().child(search.tree().root(), 3).unwrap();
    let node = search.tree().get(winning);
    assert!(node.is_terminal);
    assert_eq!(node.mean_reward(), 1.0);
    assert_eq!(search.best_move(), Some(3));
}

// =============================================================================
// Search Quality Tests
// =============================================================================

#[test]
fn test_forced_win_outweighs_siblings_as_time_grows() {
    let game = immediate_win();

    for ms in [100, 300] {
        let mut search = MCTSSearch::new(MCTSConfig::default());
        let weights = search.think(&game, Duration::from_millis(ms)).unwrap();

        let winning = weights.iter().find(|(mv, _)| *mv == 3).unwrap().1;
        let best_other = weights
            .iter()
            .filter(|(mv, _)| *mv != 3)
            .map(|(_, w)| *w)
            .fold(f64::MIN, f64::max);

        assert_eq!(winning, 1.0, "{ms} ms");
        assert!(winning > best_other, "{ms} ms: {winning} vs {best_other}");
    }
}

#[test]
fn test_blocks_opponent_threat() {
    // Player 2 has three on the bottom row (0, 1, 2); player 1 must take 3.
    let game = position(&[6, 0, 6, 1, 5, 2]);
    assert_eq!(game.current_player(), Player::One);

    let mut search = MCTSSearch::new(MCTSConfig::default());
    let best = search.search_iterations(&game, 10_000).unwrap();

    assert_eq!(best, Some(3));
}

// =============================================================================
// Time Budget Tests
// =============================================================================

#[test]
fn test_think_respects_duration() {
    let game = Game::default();
    let mut search = MCTSSearch::new(MCTSConfig::default());

    let budget = Duration::from_millis(50);
    let start = Instant::now();
    let weights = search.think(&game, budget).unwrap();
    let elapsed = start.elapsed();

    assert!(elapsed >= budget);
    assert!(elapsed < budget + Duration::from_secs(2));
    assert_eq!(weights.len(), 7);
    assert!(search.stats().iterations > 1);
    assert!(search.stats().time_us >= 50_000);
}

#[test]
fn test_think_weights_follow_valid_moves() {
    let mut game = Game::default();
    for _ in 0..6 {
        game.drop(2).unwrap();
    }
    let mut search = MCTSSearch::new(MCTSConfig::default());

    let weights = search.think(&game, Duration::from_millis(10)).unwrap();

    let moves: Vec<_> = weights.iter().map(|(mv, _)| *mv).collect();
    assert_eq!(moves, game.valid_moves());
}

#[test]
fn test_think_before_full_expansion() {
    let game = Game::new(GameConfig::new(9, 6, 4)).unwrap();
    let mut search = MCTSSearch::new(MCTSConfig::default());

    let weights = search.think(&game, Duration::ZERO).unwrap();

    assert_eq!(weights.len(), 9);
    assert_eq!(weights.iter().filter(|(_, w)| *w == UNEXPLORED_WEIGHT).count(), 8);
}

#[test]
fn test_think_on_finished_game() {
    let game = position(&[0, 1, 0, 1, 0, 1, 0]);
    let mut search = MCTSSearch::new(MCTSConfig::default());

    assert_eq!(
        search.think(&game, Duration::from_millis(10)),
        Err(SearchError::GameAlreadyOver)
    );
}

// =============================================================================
// Tree Reuse Tests
// =============================================================================

#[test]
fn test_tree_follows_game_across_moves() {
    let mut game = Game::default();
    let mut search = MCTSSearch::new(MCTSConfig::default());

    for _ in 0..4 {
        search.think(&game, Duration::from_millis(10)).unwrap();
        let best = search.best_move().unwrap();
        game.drop(best).unwrap();

        search.search_iterations(&game, 0).unwrap();
        let root = search.tree().root_node();
        assert_eq!(root.to_move, game.current_player());
        assert!(root.parent.is_none());
        assert!(search.tree().iter().all(|(id, n)| id == NodeId::new(0) || !n.parent.is_none()));
    }
}

#[test]
fn test_move_weights_after_think() {
    let game = position(&[3]);
    let mut search = MCTSSearch::new(MCTSConfig::default());
    let weights = search.think(&game, Duration::from_millis(50)).unwrap();

    let moves = game.valid_moves();
    let looked_up = search.move_weights(&game.serialize_state(), &moves);

    for ((mv, weight), again) in weights.iter().zip(looked_up) {
        if *weight == UNEXPLORED_WEIGHT {
            assert_eq!(again, 0.0, "unexpanded move {mv}");
        } else {
            assert_eq!(*weight, again, "move {mv}");
        }
    }
}

// =============================================================================
// Custom Policy Tests
// =============================================================================

/// Always descends into the first expanded child.
struct FirstChild;

impl SelectionPolicy<usize> for FirstChild {
    fn select(&self, _tree: &MCTSTree<usize>, _node: NodeId, _config: &MCTSConfig) -> usize {
        0
    }
}

/// Always plays the leftmost open column.
struct LeftmostColumn;

impl SimulationPolicy<Game> for LeftmostColumn {
    fn pick_move(&self, position: &Game, _rng: &mut GameRng) -> Option<usize> {
        position.valid_moves().first().copied()
    }
}

#[test]
fn test_leftmost_rollout_outcome() {
    // Columns fill one at a time, so each row belongs to one player and
    // player 1 completes the bottom row with the 19th drop.
    let mut game = Game::default();
    let result = rollout(&LeftmostColumn, &mut game, &mut GameRng::new(0));

    assert_eq!(result, GameResult::Winner(Player::One));
    assert_eq!(game.move_count(), 19);
    assert_eq!(game.winner_cells(), Some(&[(0, 0), (1, 0), (2, 0), (3, 0)][..]));
}

#[test]
fn test_custom_selection_policy() {
    let game = Game::default();
    let mut search = MCTSSearch::new(MCTSConfig::default()).with_selection(FirstChild);

    search.search_iterations(&game, 100).unwrap();

    // Seven iterations expand the root, the rest all go through child 0.
    let root_stats = search.root_stats();
    assert_eq!(root_stats.len(), 7);
    assert_eq!(root_stats[0].visits, 94);
    assert!(root_stats[1..].iter().all(|s| s.visits == 1));
}

#[test]
fn test_custom_simulation_policy() {
    let game = position(&[3, 3]);
    let config = MCTSConfig::default().with_seed(5);

    let mut first = MCTSSearch::new(config.clone()).with_simulation(LeftmostColumn);
    let mut second = MCTSSearch::new(config).with_simulation(LeftmostColumn);

    let best = first.search_iterations(&game, 300).unwrap();
    assert_eq!(best, second.search_iterations(&game, 300).unwrap());
    assert!(best.is_some_and(|col| col < 7));
    assert_eq!(first.stats().simulations, 300);
}
