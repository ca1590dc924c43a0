use std::collections::HashSet;

use proptest::prelude::*;

use ascent::tree::{
    NodeProgress, SkillLevel, SkillNode, SkillTree, StudentProgress, UnlockRequirement,
};

/// Every generated score gate points at this quiz.
const PLACEMENT_QUIZ: &str = "placement-quiz";

/// Linear chain: node-0 <- node-1 <- ... with the given XP gates, plus a
/// score gate on the placement quiz where a cutoff is present.
fn chain_tree(xp_requirements: &[u64], quiz_cutoffs: &[Option<f64>]) -> SkillTree {
    let mut tree = SkillTree::new("chain", "");
    let mut prev: Option<String> = None;
    for (i, (&xp, cutoff)) in xp_requirements.iter().zip(quiz_cutoffs).enumerate() {
        let id = format!("node-{i}");
        let mut node = SkillNode::new(&id, &id, SkillLevel::Recognition);
        node.xp_required = xp;
        if let Some(min_score) = *cutoff {
            node.unlock_requirements.push(UnlockRequirement::QuizScore {
                quiz_id: PLACEMENT_QUIZ.to_string(),
                min_score,
            });
        }
        if let Some(prev) = &prev {
            node.prerequisites.push(prev.clone());
        }
        tree.add_node(node);
        prev = Some(id);
    }
    tree
}

fn progress_with(total_xp: u64, placement_score: f64, completed: &[String]) -> StudentProgress {
    let mut progress = StudentProgress {
        total_xp,
        ..StudentProgress::default()
    };
    progress
        .quiz_scores
        .insert(PLACEMENT_QUIZ.to_string(), placement_score);
    for id in completed {
        progress
            .nodes
            .insert(id.clone(), NodeProgress { completed: true });
    }
    progress
}

/// XP gates, optional quiz cutoffs of matching length, a completion mask,
/// two XP totals, and two placement quiz scores.
fn arb_chain_case()
-> impl Strategy<Value = (Vec<u64>, Vec<Option<f64>>, Vec<bool>, u64, u64, f64, f64)> {
    prop::collection::vec(0u64..500, 1..12).prop_flat_map(|gates| {
        let len = gates.len();
        (
            Just(gates),
            prop::collection::vec(prop::option::of(1.0f64..100.0), len),
            prop::collection::vec(any::<bool>(), len),
            0u64..1500,
            0u64..1500,
            0.0f64..110.0,
            0.0f64..110.0,
        )
    })
}

fn completed_ids(mask: &[bool]) -> Vec<String> {
    mask.iter()
        .enumerate()
        .filter(|(_, completed)| **completed)
        .map(|(i, _)| format!("node-{i}"))
        .collect()
}

fn unlocked_ids(tree: &SkillTree, progress: &StudentProgress) -> HashSet<String> {
    tree.unlocked_nodes(progress)
        .iter()
        .map(|n| n.id.clone())
        .collect()
}

proptest! {
    #[test]
    fn test_gaining_xp_never_locks_nodes(
        (gates, cutoffs, mask, a, b, score, _) in arb_chain_case()
    ) {
        let tree = chain_tree(&gates, &cutoffs);
        let completed = completed_ids(&mask);
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };

        let before = unlocked_ids(&tree, &progress_with(lo, score, &completed));
        let after = unlocked_ids(&tree, &progress_with(hi, score, &completed));
        prop_assert!(before.is_subset(&after));
    }

    #[test]
    fn test_raising_quiz_scores_never_locks_nodes(
        (gates, cutoffs, mask, xp, _, a, b) in arb_chain_case()
    ) {
        let tree = chain_tree(&gates, &cutoffs);
        let completed = completed_ids(&mask);
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };

        let before = unlocked_ids(&tree, &progress_with(xp, lo, &completed));
        let after = unlocked_ids(&tree, &progress_with(xp, hi, &completed));
        prop_assert!(before.is_subset(&after));
    }

    #[test]
    fn test_completing_nodes_never_locks_others(
        (gates, cutoffs, mask, xp, _, score, _) in arb_chain_case(),
        extra in 0usize..12
    ) {
        let tree = chain_tree(&gates, &cutoffs);
        let completed = completed_ids(&mask);

        let mut more = completed.clone();
        more.push(format!("node-{}", extra % gates.len()));

        let before = unlocked_ids(&tree, &progress_with(xp, score, &completed));
        let after = unlocked_ids(&tree, &progress_with(xp, score, &more));
        prop_assert!(before.is_subset(&after));
    }

    #[test]
    fn test_earning_badges_never_locks_nodes(
        (gates, cutoffs, mask, xp, _, score, _) in arb_chain_case()
    ) {
        let mut tree = chain_tree(&gates, &cutoffs);
        for i in (0..gates.len()).step_by(2) {
            let id = format!("node-{i}");
            let mut node = tree.node(&id).unwrap().clone();
            node.unlock_requirements.push(UnlockRequirement::BadgesEarned {
                badge_ids: vec!["first-steps".to_string()],
            });
            tree.add_node(node);
        }
        let completed = completed_ids(&mask);

        let before = unlocked_ids(&tree, &progress_with(xp, score, &completed));
        let mut earned = progress_with(xp, score, &completed);
        earned.badges.insert("first-steps".to_string());
        let after = unlocked_ids(&tree, &earned);
        prop_assert!(before.is_subset(&after));
    }

    #[test]
    fn test_completion_ratio_stays_in_unit_interval(
        (gates, cutoffs, mask, xp, _, score, _) in arb_chain_case()
    ) {
        let tree = chain_tree(&gates, &cutoffs);
        let progress = progress_with(xp, score, &completed_ids(&mask));
        let ratio = tree.completion_ratio(&progress);
        prop_assert!((0.0..=1.0).contains(&ratio), "ratio out of range: {ratio}");
        if mask.iter().all(|&done| done) {
            prop_assert!(
                (ratio - 1.0).abs() < f64::EPSILON,
                "every node completed but ratio is {ratio}"
            );
        }
    }

    #[test]
    fn test_frontier_is_disjoint_and_reachable(
        (gates, cutoffs, mask, xp, _, score, _) in arb_chain_case()
    ) {
        let tree = chain_tree(&gates, &cutoffs);
        let progress = progress_with(xp, score, &completed_ids(&mask));

        let unlocked = unlocked_ids(&tree, &progress);
        for node in tree.next_available_nodes(&progress) {
            prop_assert!(!unlocked.contains(&node.id));
            for prereq in &node.prerequisites {
                prop_assert!(
                    unlocked.contains(prereq),
                    "frontier node {} has prerequisite {} outside the unlocked set",
                    node.id,
                    prereq
                );
            }
        }
    }

    #[test]
    fn test_gateless_nodes_unlock_for_anyone(
        (gates, cutoffs, mask, xp, _, score, _) in arb_chain_case()
    ) {
        let mut tree = chain_tree(&gates, &cutoffs);
        tree.add_node(SkillNode::new("free", "Free", SkillLevel::Recognition));

        let progress = progress_with(xp, score, &completed_ids(&mask));
        prop_assert!(unlocked_ids(&tree, &progress).contains("free"));
    }
}
