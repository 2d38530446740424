//! End-to-end lifecycle tests: bootstrap vs resume, supervised startup,
//! reverse teardown, and abort handling, driven through real bootstrap
//! artifacts in a temp directory.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use meridian_crypto::keypair_from_seed;
use meridian_model::bootstrap::{
    node_info_priv_filename, PATH_DKG_DATA_PUB, PATH_ROOT_BLOCK, PATH_ROOT_QC, PATH_ROOT_RESULT,
    PATH_ROOT_SEAL,
};
use meridian_model::{
    Block, ChainId, DkgParticipant, DkgPublicData, ExecutionResult, Header, Identifier, Identity,
    Payload, QuorumCertificate, Role, Seal, StateCommitment,
};
use meridian_node::{
    Component, NodeBuilder, NodeConfig, NodeError, NodeIdentity, Signal, Signals, ABORT_EXIT_CODE,
};

// ── Fixtures ───────────────────────────────────────────────────────────

struct Fixture {
    _dir: tempfile::TempDir,
    config: NodeConfig,
    chain_id: ChainId,
}

/// Write a complete, consistent set of bootstrap artifacts plus this
/// node's private identity file, and return a config pointing at them.
fn fixture() -> Fixture {
    let dir = tempfile::tempdir().expect("temp dir");
    let bootstrap_dir = dir.path().join("bootstrap");
    let data_dir = dir.path().join("data");
    std::fs::create_dir_all(&bootstrap_dir).expect("bootstrap dir");

    let staking = keypair_from_seed(&[11; 32]);
    let network = keypair_from_seed(&[12; 32]);
    let node_id = Identifier::from_data(b"lifecycle-test-node");

    let identity = Identity {
        node_id,
        role: Role::Consensus,
        address: "127.0.0.1:3569".into(),
        staking_pub_key: staking.public.clone(),
        network_pub_key: network.public.clone(),
        stake: 1000,
    };
    let payload = Payload {
        identities: vec![identity],
        guarantees: vec![],
        seals: vec![],
    };
    let chain_id = ChainId::new("meridian-test");
    let block = Block {
        header: Header {
            chain_id: chain_id.clone(),
            parent_id: Identifier::ZERO,
            height: 0,
            payload_hash: payload.hash(),
            timestamp_ms: 0,
            view: 0,
            proposer_id: node_id,
        },
        payload,
    };
    let result = ExecutionResult {
        block_id: block.id(),
        previous_result_id: Identifier::ZERO,
        final_state: StateCommitment::ZERO,
    };
    let seal = Seal {
        block_id: block.id(),
        result_id: result.id(),
        final_state: result.final_state,
    };
    let qc = QuorumCertificate {
        view: 0,
        block_id: block.id(),
        signer_ids: vec![node_id],
        sig_data: vec![0xaa; 48],
    };
    let dkg = DkgPublicData {
        group_pub_key: vec![0xbb; 48],
        participants: vec![DkgParticipant {
            node_id,
            share_pub_key: vec![0xcc; 48],
            index: 0,
        }],
    };
    let keys = NodeIdentity {
        node_id,
        role: Role::Consensus,
        staking_key: staking.private,
        network_key: network.private,
    };

    write_json(&bootstrap_dir.join(PATH_ROOT_BLOCK), &block);
    write_json(&bootstrap_dir.join(PATH_ROOT_QC), &qc);
    write_json(&bootstrap_dir.join(PATH_ROOT_RESULT), &result);
    write_json(&bootstrap_dir.join(PATH_ROOT_SEAL), &seal);
    write_json(&bootstrap_dir.join(PATH_DKG_DATA_PUB), &dkg);
    write_json(&bootstrap_dir.join(node_info_priv_filename(&node_id)), &keys);

    let config = NodeConfig {
        node_id: node_id.to_string(),
        bootstrap_dir,
        data_dir,
        timeout_ms: 5_000,
        ..Default::default()
    };
    Fixture {
        _dir: dir,
        config,
        chain_id,
    }
}

fn write_json<T: serde::Serialize>(path: &std::path::Path, value: &T) {
    std::fs::write(path, serde_json::to_string(value).expect("encode")).expect("write");
}

// ── Controllable test component ────────────────────────────────────────

struct TestComponent {
    signals: Signals,
    stop_called: Arc<AtomicBool>,
    /// When set, `stop` does not fire `done`.
    hang_done: bool,
    /// Fired when `stop` is called; lets tests synchronize on the walk.
    on_stop: Signal,
    stop_log: Arc<Mutex<Vec<String>>>,
    name: String,
}

impl TestComponent {
    fn ready_now(
        name: &str,
        stop_log: Arc<Mutex<Vec<String>>>,
        hang_done: bool,
    ) -> Arc<Self> {
        let component = Arc::new(Self {
            signals: Signals::new(),
            stop_called: Arc::new(AtomicBool::new(false)),
            hang_done,
            on_stop: Signal::new(),
            stop_log,
            name: name.to_string(),
        });
        component.signals.ready.fire();
        component
    }
}

impl Component for TestComponent {
    fn ready(&self) -> Signal {
        self.signals.ready.clone()
    }

    fn done(&self) -> Signal {
        self.signals.done.clone()
    }

    fn stop(&self) {
        self.stop_called.store(true, Ordering::SeqCst);
        self.on_stop.fire();
        self.stop_log.lock().unwrap().push(self.name.clone());
        if !self.hang_done {
            self.signals.done.fire();
        }
    }
}

/// Poll until `count` components have started, then give the run loop a
/// moment to settle into its steady-state wait.
async fn wait_for_running(start_log: &Arc<Mutex<Vec<String>>>, count: usize) {
    for _ in 0..200 {
        if start_log.lock().unwrap().len() >= count {
            tokio::time::sleep(Duration::from_millis(100)).await;
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("components never started");
}

// ── S1: bootstrap path ─────────────────────────────────────────────────

#[tokio::test]
async fn bootstrap_runs_callbacks_once_and_starts_components() {
    let fixture = fixture();
    let callback_a = Arc::new(AtomicUsize::new(0));
    let callback_b = Arc::new(AtomicUsize::new(0));
    let start_log = Arc::new(Mutex::new(Vec::new()));
    let stop_log = Arc::new(Mutex::new(Vec::new()));

    let mut builder = NodeBuilder::new(fixture.config.clone());
    {
        let a = Arc::clone(&callback_a);
        let b = Arc::clone(&callback_b);
        builder = builder
            .on_bootstrap("epoch-setup", move |mutator| {
                mutator.put("initialized", b"1")?;
                a.fetch_add(1, Ordering::SeqCst);
                Ok(())
            })
            .on_bootstrap("token-mint", move |_mutator| {
                b.fetch_add(1, Ordering::SeqCst);
                Ok(())
            });
    }
    for name in ["ingestion", "consensus"] {
        let starts = Arc::clone(&start_log);
        let stops = Arc::clone(&stop_log);
        builder = builder.component(name, move |_node| {
            starts.lock().unwrap().push(name.to_string());
            Ok(TestComponent::ready_now(name, stops, false) as Arc<dyn Component>)
        });
    }

    let shutdown = builder.shutdown_handle();
    let run = tokio::spawn(builder.run());
    wait_for_running(&start_log, 2).await;
    shutdown.terminate();

    run.await.expect("task").expect("graceful stop");
    assert_eq!(callback_a.load(Ordering::SeqCst), 1);
    assert_eq!(callback_b.load(Ordering::SeqCst), 1);
    assert_eq!(*start_log.lock().unwrap(), vec!["ingestion", "consensus"]);
    assert_eq!(*stop_log.lock().unwrap(), vec!["consensus", "ingestion"]);
}

#[tokio::test]
async fn failing_bootstrap_callback_is_fatal() {
    let fixture = fixture();
    let later_callback = Arc::new(AtomicUsize::new(0));
    let start_log: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));

    let count = Arc::clone(&later_callback);
    let starts = Arc::clone(&start_log);
    let stops = Arc::clone(&start_log);
    let builder = NodeBuilder::new(fixture.config.clone())
        .on_bootstrap("epoch-setup", |_mutator| Ok(()))
        .on_bootstrap("token-mint", |_mutator| {
            Err(NodeError::Config("supply overflow".into()))
        })
        .on_bootstrap("account-seed", move |_mutator| {
            count.fetch_add(1, Ordering::SeqCst);
            Ok(())
        })
        .component("engine", move |_node| {
            starts.lock().unwrap().push("engine".into());
            Ok(TestComponent::ready_now("engine", stops, false) as Arc<dyn Component>)
        });

    let err = builder.run().await.unwrap_err();
    assert!(matches!(err, NodeError::BootstrapCallback { ref name, .. } if name == "token-mint"));
    // Callbacks after the failing one never run; no component starts.
    assert_eq!(later_callback.load(Ordering::SeqCst), 0);
    assert!(start_log.lock().unwrap().is_empty());
}

// ── S2: resume path ────────────────────────────────────────────────────

#[tokio::test]
async fn resume_skips_callbacks_and_rereads_artifacts() {
    let fixture = fixture();
    let callbacks = Arc::new(AtomicUsize::new(0));

    // First run bootstraps; terminate is pre-fired so it stops right away.
    {
        let count = Arc::clone(&callbacks);
        let builder = NodeBuilder::new(fixture.config.clone()).on_bootstrap(
            "epoch-setup",
            move |_mutator| {
                count.fetch_add(1, Ordering::SeqCst);
                Ok(())
            },
        );
        builder.shutdown_handle().terminate();
        builder.run().await.expect("bootstrap run");
    }
    assert_eq!(callbacks.load(Ordering::SeqCst), 1);

    // Second run resumes: no callback invocations, chain id recomputed
    // from the disk artifact.
    let seen_chain_id = Arc::new(Mutex::new(None));
    {
        let count = Arc::clone(&callbacks);
        let seen = Arc::clone(&seen_chain_id);
        let builder = NodeBuilder::new(fixture.config.clone())
            .on_bootstrap("epoch-setup", move |_mutator| {
                count.fetch_add(1, Ordering::SeqCst);
                Ok(())
            })
            .module("chain-id-probe", move |node| {
                *seen.lock().unwrap() = Some(node.root.chain_id.clone());
                assert!(!node.bootstrapped);
                // No bind override configured, so the persisted identity's
                // address is used.
                assert_eq!(node.bind_addr(), "127.0.0.1:3569");
                Ok(())
            });
        builder.shutdown_handle().terminate();
        builder.run().await.expect("resume run");
    }
    assert_eq!(callbacks.load(Ordering::SeqCst), 1);
    assert_eq!(*seen_chain_id.lock().unwrap(), Some(fixture.chain_id));
}

#[tokio::test]
async fn resume_fails_when_a_disk_artifact_disappears() {
    let fixture = fixture();

    let builder = NodeBuilder::new(fixture.config.clone());
    builder.shutdown_handle().terminate();
    builder.run().await.expect("bootstrap run");

    // The root block artifact is re-read on every resume; removing it is
    // fatal even though genesis is already committed.
    std::fs::remove_file(fixture.config.bootstrap_dir.join(PATH_ROOT_BLOCK)).expect("remove");

    let builder = NodeBuilder::new(fixture.config.clone());
    builder.shutdown_handle().terminate();
    let err = builder.run().await.unwrap_err();
    assert!(matches!(err, NodeError::BootstrapArtifact { .. }));
    assert!(err.to_string().contains("root block"));
}

// ── S3: factory failure ────────────────────────────────────────────────

#[tokio::test]
async fn factory_error_is_fatal_and_skips_teardown() {
    let fixture = fixture();
    let start_log = Arc::new(Mutex::new(Vec::new()));
    let stop_log: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));

    let mut builder = NodeBuilder::new(fixture.config.clone());
    for i in 1..=5u32 {
        let starts = Arc::clone(&start_log);
        let stops = Arc::clone(&stop_log);
        let name = format!("component-{i}");
        builder = builder.component(name.clone(), move |_node| {
            starts.lock().unwrap().push(name.clone());
            if i == 3 {
                return Err(NodeError::Config("listener port in use".into()));
            }
            Ok(TestComponent::ready_now(&name, stops, false) as Arc<dyn Component>)
        });
    }

    let err = builder.run().await.unwrap_err();
    assert!(matches!(err, NodeError::ComponentInit { ref name, .. } if name == "component-3"));
    // Factories 4 and 5 never ran; no done signal was awaited for anyone.
    assert_eq!(
        *start_log.lock().unwrap(),
        vec!["component-1", "component-2", "component-3"]
    );
    assert!(stop_log.lock().unwrap().is_empty());
}

// ── S4: readiness timeout ──────────────────────────────────────────────

#[tokio::test]
async fn readiness_timeout_is_fatal_and_blocks_later_factories() {
    let mut fixture = fixture();
    fixture.config.timeout_ms = 100;
    let start_log = Arc::new(Mutex::new(Vec::new()));
    let stop_log: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));

    let starts = Arc::clone(&start_log);
    let builder = NodeBuilder::new(fixture.config.clone())
        .component("never-ready", move |_node| {
            starts.lock().unwrap().push("never-ready".to_string());
            // Ready is never fired.
            Ok(Arc::new(TestComponent {
                signals: Signals::new(),
                stop_called: Arc::new(AtomicBool::new(false)),
                hang_done: false,
                on_stop: Signal::new(),
                stop_log: Arc::new(Mutex::new(Vec::new())),
                name: "never-ready".into(),
            }) as Arc<dyn Component>)
        })
        .component("after", {
            let starts = Arc::clone(&start_log);
            let stops = Arc::clone(&stop_log);
            move |_node| {
                starts.lock().unwrap().push("after".to_string());
                Ok(TestComponent::ready_now("after", stops, false) as Arc<dyn Component>)
            }
        });

    let begun = std::time::Instant::now();
    let err = builder.run().await.unwrap_err();
    let elapsed = begun.elapsed();

    assert!(matches!(err, NodeError::ReadinessTimeout { ref name, .. } if name == "never-ready"));
    assert!(elapsed >= Duration::from_millis(100));
    assert!(elapsed < Duration::from_secs(3));
    assert_eq!(*start_log.lock().unwrap(), vec!["never-ready"]);
}

// ── Startup abort ──────────────────────────────────────────────────────

#[tokio::test]
async fn signal_during_readiness_wait_aborts_startup() {
    let fixture = fixture();
    let start_log = Arc::new(Mutex::new(Vec::new()));
    let stop_log: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));

    let mut builder = NodeBuilder::new(fixture.config.clone());
    {
        let starts = Arc::clone(&start_log);
        let stops = Arc::clone(&stop_log);
        builder = builder.component("first", move |_node| {
            starts.lock().unwrap().push("first".to_string());
            Ok(TestComponent::ready_now("first", stops, false) as Arc<dyn Component>)
        });
    }
    {
        let starts = Arc::clone(&start_log);
        builder = builder.component("stuck", move |_node| {
            starts.lock().unwrap().push("stuck".to_string());
            // Ready is never fired; the run parks in the readiness wait.
            Ok(Arc::new(TestComponent {
                signals: Signals::new(),
                stop_called: Arc::new(AtomicBool::new(false)),
                hang_done: false,
                on_stop: Signal::new(),
                stop_log: Arc::new(Mutex::new(Vec::new())),
                name: "stuck".into(),
            }) as Arc<dyn Component>)
        });
    }
    {
        let starts = Arc::clone(&start_log);
        let stops = Arc::clone(&stop_log);
        builder = builder.component("after", move |_node| {
            starts.lock().unwrap().push("after".to_string());
            Ok(TestComponent::ready_now("after", stops, false) as Arc<dyn Component>)
        });
    }

    let shutdown = builder.shutdown_handle();
    let run = tokio::spawn(builder.run());
    // Wait until the stuck component's factory has run, then signal while
    // its readiness wait is in progress.
    wait_for_running(&start_log, 2).await;
    shutdown.terminate();

    let err = run.await.expect("task").unwrap_err();
    assert!(matches!(err, NodeError::Aborted { phase: "startup" }));
    assert_eq!(err.exit_code(), ABORT_EXIT_CODE);
    // The factory after the stuck component was never invoked, and no
    // teardown walk ran.
    assert_eq!(*start_log.lock().unwrap(), vec!["first", "stuck"]);
    assert!(stop_log.lock().unwrap().is_empty());
}

// ── Shutdown timeout ───────────────────────────────────────────────────

#[tokio::test]
async fn done_wait_timeout_is_a_shutdown_error() {
    let mut fixture = fixture();
    fixture.config.timeout_ms = 100;
    let start_log = Arc::new(Mutex::new(Vec::new()));
    let stop_log = Arc::new(Mutex::new(Vec::new()));

    let starts = Arc::clone(&start_log);
    let stops = Arc::clone(&stop_log);
    let builder = NodeBuilder::new(fixture.config.clone()).component("wedged", move |_node| {
        starts.lock().unwrap().push("wedged".to_string());
        // Acknowledges stop but never fires done.
        Ok(TestComponent::ready_now("wedged", stops, true) as Arc<dyn Component>)
    });

    let shutdown = builder.shutdown_handle();
    let run = tokio::spawn(builder.run());
    wait_for_running(&start_log, 1).await;
    shutdown.terminate();

    let err = run.await.expect("task").unwrap_err();
    assert!(
        matches!(err, NodeError::ShutdownTimeout { ref name, timeout_ms } if name == "wedged" && timeout_ms == 100)
    );
    // Stop was requested before the wait began.
    assert_eq!(*stop_log.lock().unwrap(), vec!["wedged"]);
}

// ── S5: abort during teardown ──────────────────────────────────────────

#[tokio::test]
async fn abort_during_shutdown_abandons_the_walk() {
    let fixture = fixture();
    let start_log = Arc::new(Mutex::new(Vec::new()));
    let stop_log = Arc::new(Mutex::new(Vec::new()));
    let hang_reached = Signal::new();
    let early_stop_flags: Arc<Mutex<Vec<Arc<AtomicBool>>>> = Arc::new(Mutex::new(Vec::new()));

    let mut builder = NodeBuilder::new(fixture.config.clone());
    for i in 1..=5u32 {
        let starts = Arc::clone(&start_log);
        let stops = Arc::clone(&stop_log);
        let flags = Arc::clone(&early_stop_flags);
        let hang = hang_reached.clone();
        let name = format!("component-{i}");
        builder = builder.component(name.clone(), move |_node| {
            starts.lock().unwrap().push(name.clone());
            // Stop order is 5, 4, 3, ...; component 3 hangs its done
            // signal so the walk parks there.
            let component = Arc::new(TestComponent {
                signals: Signals::new(),
                stop_called: Arc::new(AtomicBool::new(false)),
                hang_done: i == 3,
                on_stop: if i == 3 { hang.clone() } else { Signal::new() },
                stop_log: stops,
                name: name.clone(),
            });
            component.signals.ready.fire();
            if i <= 2 {
                flags.lock().unwrap().push(Arc::clone(&component.stop_called));
            }
            Ok(component as Arc<dyn Component>)
        });
    }

    let shutdown = builder.shutdown_handle();
    let run = tokio::spawn(builder.run());
    wait_for_running(&start_log, 5).await;

    shutdown.terminate();
    hang_reached.fired().await;
    tokio::time::sleep(Duration::from_millis(50)).await;
    shutdown.abort();

    let err = run.await.expect("task").unwrap_err();
    assert!(matches!(err, NodeError::Aborted { phase: "shutdown" }));
    assert_eq!(err.exit_code(), ABORT_EXIT_CODE);

    // Components 5 and 4 stopped, 3 was asked to stop, 1 and 2 were never
    // touched.
    assert_eq!(
        *stop_log.lock().unwrap(),
        vec!["component-5", "component-4", "component-3"]
    );
    for flag in early_stop_flags.lock().unwrap().iter() {
        assert!(!flag.load(Ordering::SeqCst));
    }
}

// ── Key consistency ────────────────────────────────────────────────────

#[tokio::test]
async fn key_mismatch_is_fatal_before_any_component_starts() {
    let fixture = fixture();
    let node_id = fixture.config.node_id().expect("node id");

    // Replace the private info with keys that do not match the identity
    // table committed at genesis.
    let wrong_staking = keypair_from_seed(&[99; 32]);
    let wrong_network = keypair_from_seed(&[98; 32]);
    let tampered = NodeIdentity {
        node_id,
        role: Role::Consensus,
        staking_key: wrong_staking.private,
        network_key: wrong_network.private,
    };
    write_json(
        &fixture
            .config
            .bootstrap_dir
            .join(node_info_priv_filename(&node_id)),
        &tampered,
    );

    let start_log: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
    let starts = Arc::clone(&start_log);
    let stops = Arc::clone(&start_log);
    let builder = NodeBuilder::new(fixture.config.clone()).component("engine", move |_node| {
        starts.lock().unwrap().push("engine".into());
        Ok(TestComponent::ready_now("engine", stops, false) as Arc<dyn Component>)
    });

    let err = builder.run().await.unwrap_err();
    assert!(matches!(err, NodeError::Consistency { .. }));
    assert!(start_log.lock().unwrap().is_empty());
}

// ── Ordering property ──────────────────────────────────────────────────

mod ordering {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(8))]

        /// Components start in registration order and stop in exactly the
        /// reverse of the successful-start order.
        #[test]
        fn start_order_is_registration_order_and_stop_is_reverse(n in 1usize..6) {
            let runtime = tokio::runtime::Runtime::new().expect("runtime");
            runtime.block_on(async move {
                let fixture = fixture();
                let start_log = Arc::new(Mutex::new(Vec::new()));
                let stop_log = Arc::new(Mutex::new(Vec::new()));

                let mut builder = NodeBuilder::new(fixture.config.clone());
                let names: Vec<String> = (0..n).map(|i| format!("component-{i}")).collect();
                for name in &names {
                    let starts = Arc::clone(&start_log);
                    let stops = Arc::clone(&stop_log);
                    let name = name.clone();
                    builder = builder.component(name.clone(), move |_node| {
                        starts.lock().unwrap().push(name.clone());
                        Ok(TestComponent::ready_now(&name, stops, false) as Arc<dyn Component>)
                    });
                }

                let shutdown = builder.shutdown_handle();
                let run = tokio::spawn(builder.run());
                wait_for_running(&start_log, n).await;
                shutdown.terminate();
                run.await.expect("task").expect("graceful stop");

                let started = start_log.lock().unwrap().clone();
                let stopped = stop_log.lock().unwrap().clone();
                prop_assert_eq!(&started, &names);
                let mut reversed = started;
                reversed.reverse();
                prop_assert_eq!(stopped, reversed);
                Ok(())
            })?;
        }
    }
}
