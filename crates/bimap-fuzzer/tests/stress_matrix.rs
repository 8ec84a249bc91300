use bimap_fuzzer::{run, Action, Differential, FuzzConfig};

#[test]
fn ten_thousand_steps_small_key_space_matrix() {
    for seed in [1, 2, 3] {
        let report = run(&FuzzConfig {
            steps: 10_000,
            key_space: 16,
            seed: Some(seed),
        })
        .unwrap();
        assert_eq!(report.seed, seed);
        assert_eq!(report.steps, 10_000);
        assert!(report.inserts > 0 && report.erases > 0);
        assert!(report.max_len <= 16);
    }
}

#[test]
fn ten_thousand_steps_wide_key_space_matrix() {
    // With many keys the maps grow large and deletions hit interior nodes
    // with two children far more often.
    let report = run(&FuzzConfig {
        steps: 10_000,
        key_space: 256,
        seed: Some(0xB1_4A9),
    })
    .unwrap();
    assert!(report.max_len > 64);
    // No tree holding more than 63 entries fits in 6 levels.
    assert!(report.max_depth >= 7);
}

#[test]
fn seeded_runs_replay_identically_matrix() {
    let config = FuzzConfig {
        steps: 2_000,
        key_space: 64,
        seed: Some(99),
    };
    assert_eq!(run(&config).unwrap(), run(&config).unwrap());
}

#[test]
fn unseeded_run_reports_its_seed_matrix() {
    let config = FuzzConfig {
        steps: 300,
        ..FuzzConfig::default()
    };
    let report = run(&config).unwrap();
    let replay = run(&FuzzConfig {
        seed: Some(report.seed),
        ..config
    })
    .unwrap();
    assert_eq!(report, replay);
}

#[test]
fn stepwise_driver_final_state_matches_actions_matrix() {
    let mut diff = Differential::new(&FuzzConfig {
        steps: 0,
        key_space: 32,
        seed: Some(17),
    });
    let mut live = std::collections::BTreeMap::new();
    for _ in 0..1_000 {
        match diff.step().unwrap() {
            Action::Insert { left, right } => {
                live.insert(left, right);
            }
            Action::Erase { side, key } => match side {
                bimap_forest::SideKind::Left => {
                    live.remove(&key);
                }
                bimap_forest::SideKind::Right => {
                    live.retain(|_, r| *r != key);
                }
            },
        }
        diff.verify().unwrap();
    }
    let actual: Vec<(i64, i64)> = diff.map().iter_left().map(|(l, r)| (*l, *r)).collect();
    let expected: Vec<(i64, i64)> = live.into_iter().collect();
    assert_eq!(actual, expected);
}
