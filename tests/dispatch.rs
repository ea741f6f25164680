//! End-to-end dispatch through a `Router`, without a network.

use std::sync::{Arc, Mutex};

use switchyard::{Context, Method, Request, Response, Router};

fn get(router: &Router, path: &str) -> Response {
    router.handle(&Request::new(Method::Get, path))
}

#[test]
fn serves_index_and_params() {
    fn index(ctx: &mut Context, _: &Request, res: &mut Response) {
        assert!(ctx.params().is_empty());
        res.write_str("index");
    }
    fn list(ctx: &mut Context, _: &Request, res: &mut Response) {
        assert!(ctx.params().is_empty());
        res.write_str("list");
    }
    fn user_detail(ctx: &mut Context, _: &Request, res: &mut Response) {
        let id = ctx.param("userid").unwrap_or_default();
        res.write_str(&format!("user detail {id}"));
    }

    let router = Router::new()
        .get("/", index)
        .get("/list", list)
        .get("/user/:userid", user_detail);

    assert_eq!(get(&router, "/").text(), "index");
    assert_eq!(get(&router, "/list").text(), "list");
    assert_eq!(get(&router, "/user/14").text(), "user detail 14");
    assert_eq!(get(&router, "/user/420").text(), "user detail 420");
    assert_eq!(get(&router, "/user/420/").status(), 404);
}

fn first(ctx: &mut Context, req: &Request, res: &mut Response) {
    res.write_str("first");
    ctx.next(req, res);
}

fn second(ctx: &mut Context, req: &Request, res: &mut Response) {
    res.write_str("second");
    ctx.next(req, res);
}

fn third(_: &mut Context, _: &Request, res: &mut Response) {
    res.write_str("third");
}

#[test]
fn runs_multiple_handlers_in_order() {
    let router = Router::new().get("/", (first, second, third));
    assert_eq!(get(&router, "/").text(), "firstsecondthird");

    fn second_stops(_: &mut Context, _: &Request, res: &mut Response) {
        res.write_str("second");
    }
    let router = Router::new().get("/", (first, second_stops, third));
    assert_eq!(get(&router, "/").text(), "firstsecond");
}

#[test]
fn mounted_handlers_run_before_route_handlers() {
    fn index_mount(ctx: &mut Context, req: &Request, res: &mut Response) {
        res.write_str("index mount|");
        ctx.next(req, res);
    }
    fn api_mount(ctx: &mut Context, req: &Request, res: &mut Response) {
        res.write_str("api mount|");
        ctx.next(req, res);
    }

    let router = Router::new()
        .mount("/", index_mount)
        .mount("/api", api_mount)
        .get("/", (second, third))
        .get("/api", (first, second));

    assert_eq!(get(&router, "/").text(), "index mount|secondthird");
    assert_eq!(get(&router, "/api").text(), "index mount|api mount|firstsecond");
}

#[test]
fn mount_after_route_does_not_apply() {
    fn late(ctx: &mut Context, req: &Request, res: &mut Response) {
        res.write_str("late|");
        ctx.next(req, res);
    }

    let router = Router::new()
        .get("/before", third)
        .mount("/", late)
        .get("/after", third);

    assert_eq!(get(&router, "/before").text(), "third");
    assert_eq!(get(&router, "/after").text(), "late|third");
}

#[test]
fn mount_prefix_is_not_segment_aware() {
    fn tag(ctx: &mut Context, req: &Request, res: &mut Response) {
        res.write_str("us|");
        ctx.next(req, res);
    }

    let router = Router::new().mount("/us", tag).get("/user/:id", third);
    assert_eq!(get(&router, "/user/5").text(), "us|third");
}

#[derive(Default)]
struct Trail {
    index_before_next: bool,
    index_after_next: bool,
    second_before_fail: bool,
    second_after_fail: bool,
    second_after_next: bool,
    third_ran: bool,
}

fn erring_router(trail: &Arc<Mutex<Trail>>, return_after_fail: bool, code: u16) -> Router {
    let t = Arc::clone(trail);
    let index = move |ctx: &mut Context, req: &Request, res: &mut Response| {
        t.lock().unwrap().index_before_next = true;
        ctx.next(req, res);
        t.lock().unwrap().index_after_next = true;
    };

    let t = Arc::clone(trail);
    let second = move |ctx: &mut Context, req: &Request, res: &mut Response| {
        t.lock().unwrap().second_before_fail = true;
        ctx.fail(req, res, "error in second handler", code);
        if return_after_fail {
            return;
        }
        t.lock().unwrap().second_after_fail = true;
        ctx.next(req, res);
        t.lock().unwrap().second_after_next = true;
    };

    let t = Arc::clone(trail);
    let third = move |_: &mut Context, _: &Request, res: &mut Response| {
        t.lock().unwrap().third_ran = true;
        res.write_str("third");
    };

    Router::new().mount("/", index).get("/", (second, third))
}

#[test]
fn fail_without_return_keeps_running_the_current_handler_only() {
    let trail = Arc::new(Mutex::new(Trail::default()));
    let router = erring_router(&trail, false, 400);

    let res = get(&router, "/");
    assert_eq!(res.status(), 400);
    assert_eq!(res.text(), "error in second handler\n");

    let trail = trail.lock().unwrap();
    assert!(trail.index_before_next && trail.index_after_next);
    assert!(trail.second_before_fail && trail.second_after_fail && trail.second_after_next);
    assert!(!trail.third_ran);
}

#[test]
fn fail_with_return_stops_the_current_handler() {
    let trail = Arc::new(Mutex::new(Trail::default()));
    let router = erring_router(&trail, true, 501);

    let res = get(&router, "/");
    assert_eq!(res.status(), 501);
    assert_eq!(res.text(), "error in second handler\n");

    let trail = trail.lock().unwrap();
    assert!(trail.index_before_next && trail.index_after_next);
    assert!(trail.second_before_fail);
    assert!(!trail.second_after_fail && !trail.second_after_next);
    assert!(!trail.third_ran);
}

#[test]
fn error_responder_fires_once_per_fail() {
    let calls = Arc::new(Mutex::new(0u32));
    let counter = Arc::clone(&calls);

    fn boom(ctx: &mut Context, req: &Request, res: &mut Response) {
        ctx.fail(req, res, "boom", 500);
        res.write_str("|after fail");
        ctx.next(req, res);
    }

    let router = Router::new()
        .get("/", (boom, third))
        .error_handler(move |_: &Request, res: &mut Response, msg: &str, code: u16| {
            *counter.lock().unwrap() += 1;
            res.set_status(code);
            res.write_str(msg);
        });

    let res = get(&router, "/");
    assert_eq!(*calls.lock().unwrap(), 1);
    assert_eq!(res.status(), 500);
    assert_eq!(res.text(), "boom|after fail");
}

#[test]
fn mounted_handler_can_fail_before_route_handlers() {
    fn guard(ctx: &mut Context, req: &Request, res: &mut Response) {
        if req.header("authorization").is_none() {
            ctx.fail(req, res, "unauthorized", 401);
            return;
        }
        ctx.next(req, res);
    }

    let router = Router::new().mount("/admin", guard).get("/admin", third);

    let res = get(&router, "/admin");
    assert_eq!(res.status(), 401);
    assert_eq!(res.text(), "unauthorized\n");

    let req = Request::new(Method::Get, "/admin").with_header("Authorization", "Bearer x");
    assert_eq!(router.handle(&req).text(), "third");
}

#[test]
fn store_hands_values_down_the_chain() {
    fn load_user(ctx: &mut Context, req: &Request, res: &mut Response) {
        let user = format!("user {}", ctx.param("userid").unwrap_or_default());
        ctx.set("user", user);
        ctx.next(req, res);
    }
    fn handle_user(ctx: &mut Context, _: &Request, res: &mut Response) {
        match ctx.get::<String>("user") {
            Some(user) => res.write_str(&format!("Hello {user}")),
            None => res.write_str("Who are you?"),
        }
    }

    let router = Router::new()
        .get("/user/:userid/hello", (load_user, handle_user))
        .get("/anonymous", handle_user);

    assert_eq!(get(&router, "/user/20/hello").text(), "Hello user 20");
    assert_eq!(get(&router, "/anonymous").text(), "Who are you?");
}

#[test]
fn router_is_shared_across_threads() {
    fn echo(ctx: &mut Context, _: &Request, res: &mut Response) {
        res.write_str(ctx.param("n").unwrap_or_default());
    }
    let router = Arc::new(Router::new().get("/n/:n", echo));

    let workers: Vec<_> = (0..16)
        .map(|i| {
            let router = Arc::clone(&router);
            std::thread::spawn(move || {
                for j in 0..50 {
                    let n = format!("{i}-{j}");
                    assert_eq!(get(&router, &format!("/n/{n}")).text(), n);
                }
            })
        })
        .collect();

    for worker in workers {
        worker.join().unwrap();
    }
}
