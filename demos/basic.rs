//! Minimal switchyard example: mounted logging, chained handlers, params,
//! request-scoped data, and error responses.
//!
//! Run with:
//!   RUST_LOG=info cargo run --example basic
//!
//! Try:
//!   curl http://localhost:3000/
//!   curl http://localhost:3000/user/20/hello
//!   curl http://localhost:3000/user/0/hello     # 404 from load_user
//!   curl http://localhost:3000/api/status -H 'authorization: token'
//!   curl http://localhost:3000/api/status       # 401 from require_auth

use switchyard::{middleware, Context, ContentType, Request, Response, Router, Server};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // Mount first: mounts only apply to routes registered after them.
    let app = Router::new()
        .mount("/", middleware::trace)
        .mount("/api", require_auth)
        .get("/", index)
        .get("/user/:userid/hello", (load_user, handle_user))
        .get("/api/status", status);

    Server::bind("0.0.0.0:3000")
        .serve(app)
        .await
        .expect("server error");
}

// GET /
fn index(_ctx: &mut Context, _req: &Request, res: &mut Response) {
    res.write_str("index");
}

// GET /user/:userid/hello, first half: load and stash the user.
fn load_user(ctx: &mut Context, req: &Request, res: &mut Response) {
    let user = match ctx.param("userid").map(user_from_db) {
        Some(Ok(user)) => user,
        Some(Err(msg)) => {
            // Let the error responder write the response, and stop here.
            ctx.fail(req, res, &msg, 404);
            return;
        }
        None => {
            ctx.fail(req, res, "missing user id", 400);
            return;
        }
    };

    ctx.set("user", user);
    ctx.next(req, res);
}

// GET /user/:userid/hello, second half: respond with what load_user stored.
fn handle_user(ctx: &mut Context, _req: &Request, res: &mut Response) {
    match ctx.get::<String>("user") {
        Some(user) => res.write_str(&format!("Hello {user}")),
        None => res.write_str("Who are you?"),
    }
}

// Mounted on /api: everything below it needs an authorization header.
fn require_auth(ctx: &mut Context, req: &Request, res: &mut Response) {
    if req.header("authorization").is_none() {
        ctx.fail(req, res, "unauthorized", 401);
        return;
    }
    ctx.next(req, res);
}

// GET /api/status
fn status(_ctx: &mut Context, _req: &Request, res: &mut Response) {
    res.set_content_type(ContentType::Json);
    res.write_str(r#"{"status":"ok"}"#);
}

fn user_from_db(id: &str) -> Result<String, String> {
    match id {
        "0" => Err(format!("no user with id {id}")),
        _ => Ok(String::from("Richard P. F.")),
    }
}
