/// Liveness probe for keep-alive pingers and load balancers.
pub async fn ping_handler() -> &'static str {
    "Pong"
}
