//! Integration tests for the route guard

use std::net::TcpListener;
use std::sync::{Arc, mpsc};
use std::thread;
use std::time::Duration;

use auth::{AuthGuard, AuthState, Decision, Principal, Role, SIGNED_IN_KEY, SessionStore};
use common::{ManualClock, MemoryStorage, RedisStorage, Storage};

const PAGES: [&str; 4] = [
    "/",
    "/employee/dashboard",
    "/employee/opening-details",
    "/admin",
];

struct Harness {
    guard: AuthGuard,
    store: SessionStore,
    storage: Arc<MemoryStorage>,
    clock: ManualClock,
}

fn harness() -> Harness {
    let storage = Arc::new(MemoryStorage::new());
    let clock = ManualClock::new(1_700_000_000_000);
    let store = SessionStore::new(storage.clone()).with_clock(Arc::new(clock.clone()));
    Harness {
        guard: AuthGuard::new(store.clone()),
        store,
        storage,
        clock,
    }
}

fn sign_in(h: &Harness, role: Role) {
    h.store.sign_in(&Principal::new("P1", role)).unwrap();
}

#[test]
fn test_unauthenticated_is_sent_to_login() {
    let h = harness();

    assert_eq!(h.guard.state(), AuthState::Unauthenticated);
    assert_eq!(
        h.guard.evaluate("/employee/dashboard"),
        Decision::Redirect("/")
    );
    assert_eq!(
        h.guard.resolve("/employee/dashboard").decision,
        Decision::Redirect("/")
    );
    assert_eq!(h.guard.resolve("/admin").decision, Decision::Redirect("/"));
    assert_eq!(
        h.guard.resolve("/some/unknown/page").decision,
        Decision::Redirect("/")
    );
}

#[test]
fn test_unauthenticated_may_stay_on_login() {
    let h = harness();
    assert_eq!(h.guard.evaluate("/"), Decision::Stay);
    assert_eq!(h.guard.resolve("/").decision, Decision::Stay);
}

#[test]
fn test_admin_bounces_off_login() {
    let h = harness();
    sign_in(&h, Role::Admin);

    assert_eq!(h.guard.evaluate("/"), Decision::Redirect("/admin"));
    assert_eq!(h.guard.resolve("/admin").decision, Decision::Stay);
}

#[test]
fn test_employee_bounces_off_login() {
    let h = harness();
    sign_in(&h, Role::Employee);

    assert_eq!(
        h.guard.evaluate("/"),
        Decision::Redirect("/employee/dashboard")
    );
    assert_eq!(h.guard.resolve("/employee/dashboard").decision, Decision::Stay);
    assert_eq!(
        h.guard.resolve("/employee/opening-details").decision,
        Decision::Stay
    );
}

#[test]
fn test_missing_role_flag_is_treated_as_employee() {
    let h = harness();
    h.storage
        .set_item(
            SIGNED_IN_KEY,
            r#"{"value": {"emp_id": "E3", "emp_name": "Kumar"}, "expiry": 9999999999999}"#,
        )
        .unwrap();

    assert!(matches!(h.guard.state(), AuthState::Employee(_)));
    assert_eq!(
        h.guard.evaluate("/"),
        Decision::Redirect("/employee/dashboard")
    );
}

#[test]
fn test_corrupt_record_fails_closed() {
    let h = harness();
    h.storage.set_item(SIGNED_IN_KEY, "}}}not-json").unwrap();

    assert_eq!(h.store.signed_in(), None);
    assert_eq!(
        h.guard.resolve("/employee/dashboard").decision,
        Decision::Redirect("/")
    );
}

#[test]
fn test_logout_sends_protected_routes_to_login() {
    let h = harness();
    sign_in(&h, Role::Employee);
    assert_eq!(h.guard.resolve("/employee/dashboard").decision, Decision::Stay);

    h.store.remove(SIGNED_IN_KEY).unwrap();

    assert_eq!(h.store.signed_in(), None);
    for path in ["/employee/dashboard", "/employee/opening-details", "/admin"] {
        assert_eq!(h.guard.resolve(path).decision, Decision::Redirect("/"));
    }
}

#[test]
fn test_expired_session_sends_protected_routes_to_login() {
    let h = harness();
    sign_in(&h, Role::Admin);

    h.clock.advance(Duration::from_secs(12 * 3600));

    assert_eq!(h.guard.resolve("/admin").decision, Decision::Redirect("/"));
    assert!(h.storage.is_empty());
}

#[test]
fn test_gate_alone_does_not_restrict_by_role() {
    let h = harness();
    sign_in(&h, Role::Employee);

    assert_eq!(h.guard.evaluate("/admin"), Decision::Stay);
}

#[test]
fn test_employee_is_kept_out_of_admin_subtree() {
    let h = harness();
    sign_in(&h, Role::Employee);

    assert_eq!(
        h.guard.protect("/admin"),
        Decision::Redirect("/employee/dashboard")
    );
    assert_eq!(
        h.guard.resolve("/admin/customers").decision,
        Decision::Redirect("/employee/dashboard")
    );
}

#[test]
fn test_admin_is_kept_out_of_employee_subtree() {
    let h = harness();
    sign_in(&h, Role::Admin);

    assert_eq!(
        h.guard.resolve("/employee/opening-details").decision,
        Decision::Redirect("/admin")
    );
}

#[test]
fn test_wrapper_sends_unauthenticated_to_login() {
    let h = harness();

    assert_eq!(h.guard.protect("/employee/dashboard"), Decision::Redirect("/"));
    assert_eq!(h.guard.protect("/"), Decision::Stay);
    assert_eq!(h.guard.protect("/about"), Decision::Stay);
}

#[test]
fn test_authenticated_unknown_route_is_left_alone() {
    let h = harness();
    sign_in(&h, Role::Employee);

    assert_eq!(h.guard.resolve("/reports").decision, Decision::Stay);
}

#[test]
fn test_redirect_targets_are_stable() {
    let cases: [Option<Role>; 3] = [None, Some(Role::Admin), Some(Role::Employee)];

    for role in cases {
        let h = harness();
        if let Some(role) = role {
            sign_in(&h, role);
        }

        for path in PAGES.iter().copied().chain(["/admin/x", "/employee/x", "/x"]) {
            if let Decision::Redirect(target) = h.guard.resolve(path).decision {
                assert_eq!(
                    h.guard.resolve(target).decision,
                    Decision::Stay,
                    "{:?} at {} redirected to {} which redirects again",
                    role,
                    path,
                    target
                );
            }
        }
    }
}

#[test]
fn test_resolution_carries_principal() {
    let h = harness();
    h.store
        .sign_in(&Principal::new("E42", Role::Employee).with_display_name("Devi"))
        .unwrap();

    let navigation = h.guard.resolve("/employee/dashboard");
    let principal = navigation.state.principal().unwrap();
    assert_eq!(principal.id, "E42");
    assert_eq!(principal.display_name.as_deref(), Some("Devi"));
}

#[test]
fn test_stalled_redis_fails_closed() {
    // Accepts connections but never answers a command
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    thread::spawn(move || {
        let held: Vec<_> = listener.incoming().collect();
        drop(held);
    });

    let storage =
        RedisStorage::open_with_timeout(&format!("redis://{}", addr), Duration::from_millis(200))
            .unwrap();
    let guard = AuthGuard::new(SessionStore::new(Arc::new(storage)));

    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let _ = tx.send(guard.resolve("/employee/dashboard"));
    });

    let navigation = rx
        .recv_timeout(Duration::from_secs(5))
        .expect("guard did not resolve against a stalled Redis");
    assert_eq!(navigation.state, AuthState::Unauthenticated);
    assert_eq!(navigation.decision, Decision::Redirect("/"));
}
