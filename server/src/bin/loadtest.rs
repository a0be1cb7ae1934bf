//! Load test for the minigolf server.
//!
//! Spawns fake WebSocket clients that join, register with `playerinfo`,
//! putt in random directions and count the `tick` broadcasts they receive.
//!
//! Usage: cargo run --bin loadtest -- [OPTIONS]
//!
//! Options:
//!   --clients N      Number of clients to spawn (default: 50)
//!   --duration S     Test duration in seconds (default: 30)
//!   --putt-rate R    Putts per second per client (default: 0.5)
//!   --url URL        Server URL (default: ws://127.0.0.1:3000/ws)

use futures_util::{SinkExt, StreamExt};
use minigolf_shared::protocol::{ClientMsg, ServerMsg};
use rand::Rng;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio_tungstenite::{connect_async, tungstenite::Message};

/// Broadcast cadence with the default server config (10 ms ticks, every 5th).
const EXPECTED_TICKS_PER_SEC: f64 = 20.0;

#[derive(Default)]
struct Metrics {
    connected: AtomicU64,
    messages_received: AtomicU64,
    ticks_received: AtomicU64,
    scores_received: AtomicU64,
    putts_sent: AtomicU64,
    errors: AtomicU64,
    total_balls_seen: AtomicU64,
    latency_sum_ms: AtomicU64,
    latency_count: AtomicU64,
}

struct Options {
    clients: u32,
    duration_secs: u64,
    putt_rate: f64,
    url: String,
}

impl Options {
    fn from_args(args: &[String]) -> Self {
        let mut options = Options {
            clients: 50,
            duration_secs: 30,
            putt_rate: 0.5,
            url: "ws://127.0.0.1:3000/ws".to_string(),
        };

        let mut i = 1;
        while i < args.len() {
            let value = args.get(i + 1);
            match args[i].as_str() {
                "--clients" => {
                    options.clients = value.and_then(|s| s.parse().ok()).unwrap_or(options.clients);
                    i += 1;
                }
                "--duration" => {
                    options.duration_secs = value
                        .and_then(|s| s.parse().ok())
                        .unwrap_or(options.duration_secs);
                    i += 1;
                }
                "--putt-rate" => {
                    options.putt_rate = value
                        .and_then(|s| s.parse().ok())
                        .unwrap_or(options.putt_rate);
                    i += 1;
                }
                "--url" => {
                    if let Some(url) = value {
                        options.url = url.clone();
                    }
                    i += 1;
                }
                other => eprintln!("Ignoring unknown argument {}", other),
            }
            i += 1;
        }
        options
    }
}

fn encode(msg: &ClientMsg) -> Option<Message> {
    serde_json::to_string(msg).ok().map(|json| Message::Text(json.into()))
}

async fn run_client(client_id: u32, url: String, putt_rate: f64, duration: Duration, metrics: Arc<Metrics>) {
    let connect_start = Instant::now();

    let (mut ws, _) = match connect_async(&url).await {
        Ok(conn) => conn,
        Err(e) => {
            if client_id < 5 {
                eprintln!("Client {} failed to connect: {}", client_id, e);
            }
            metrics.errors.fetch_add(1, Ordering::Relaxed);
            return;
        }
    };

    metrics
        .latency_sum_ms
        .fetch_add(connect_start.elapsed().as_millis() as u64, Ordering::Relaxed);
    metrics.latency_count.fetch_add(1, Ordering::Relaxed);
    metrics.connected.fetch_add(1, Ordering::Relaxed);

    // Wait for join before registering
    let joined = tokio::time::timeout(Duration::from_secs(5), async {
        while let Some(Ok(msg)) = ws.next().await {
            if let Message::Text(text) = msg {
                metrics.messages_received.fetch_add(1, Ordering::Relaxed);
                if let Ok(ServerMsg::Join(join)) = serde_json::from_str::<ServerMsg>(&text) {
                    return Some(join.self_id);
                }
            }
        }
        None
    })
    .await;

    let self_id = match joined {
        Ok(Some(id)) => id,
        Ok(None) | Err(_) => {
            if client_id < 3 {
                eprintln!("Client {} never got join", client_id);
            }
            metrics.errors.fetch_add(1, Ordering::Relaxed);
            metrics.connected.fetch_sub(1, Ordering::Relaxed);
            return;
        }
    };

    let register = ClientMsg::PlayerInfo {
        name: format!("bot-{}", client_id),
        colour: String::new(),
    };
    if let Some(frame) = encode(&register) {
        if ws.send(frame).await.is_err() {
            metrics.errors.fetch_add(1, Ordering::Relaxed);
            metrics.connected.fetch_sub(1, Ordering::Relaxed);
            return;
        }
    }
    if client_id < 3 {
        eprintln!("Client {} registered as player {}", client_id, self_id);
    }

    let putt_interval = if putt_rate > 0.0 {
        Duration::from_secs_f64(1.0 / putt_rate)
    } else {
        Duration::from_secs(3600) // Effectively never
    };
    let mut putt_timer = tokio::time::interval(putt_interval);
    putt_timer.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    let test_end = tokio::time::sleep(duration);
    tokio::pin!(test_end);

    loop {
        tokio::select! {
            _ = &mut test_end => break,

            _ = putt_timer.tick() => {
                let vec = {
                    let mut rng = rand::thread_rng();
                    [rng.gen_range(-0.5..0.5), rng.gen_range(-0.5..0.5)]
                };
                let Some(frame) = encode(&ClientMsg::Putt { vec }) else {
                    continue;
                };
                if ws.send(frame).await.is_ok() {
                    metrics.putts_sent.fetch_add(1, Ordering::Relaxed);
                } else {
                    metrics.errors.fetch_add(1, Ordering::Relaxed);
                    break;
                }
            }

            msg = ws.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        metrics.messages_received.fetch_add(1, Ordering::Relaxed);
                        match serde_json::from_str::<ServerMsg>(&text) {
                            Ok(ServerMsg::Tick(tick)) => {
                                metrics.ticks_received.fetch_add(1, Ordering::Relaxed);
                                metrics
                                    .total_balls_seen
                                    .fetch_add(tick.balls.len() as u64, Ordering::Relaxed);
                            }
                            Ok(ServerMsg::Score(_)) => {
                                metrics.scores_received.fetch_add(1, Ordering::Relaxed);
                            }
                            _ => {}
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Err(e)) => {
                        if client_id < 3 {
                            eprintln!("Client {} error: {}", client_id, e);
                        }
                        metrics.errors.fetch_add(1, Ordering::Relaxed);
                        break;
                    }
                    Some(Ok(_)) => {}
                }
            }
        }
    }

    let _ = ws.close(None).await;
    metrics.connected.fetch_sub(1, Ordering::Relaxed);
}

fn print_stats(label: &str, metrics: &Metrics) {
    let ticks = metrics.ticks_received.load(Ordering::Relaxed);
    let balls = metrics.total_balls_seen.load(Ordering::Relaxed);
    println!(
        "[{}] connected={}, msgs={}, ticks={}, scores={}, putts={}, errors={}, avg_balls={}",
        label,
        metrics.connected.load(Ordering::Relaxed),
        metrics.messages_received.load(Ordering::Relaxed),
        ticks,
        metrics.scores_received.load(Ordering::Relaxed),
        metrics.putts_sent.load(Ordering::Relaxed),
        metrics.errors.load(Ordering::Relaxed),
        if ticks > 0 { balls / ticks } else { 0 }
    );
}

#[tokio::main]
async fn main() {
    let args: Vec<String> = std::env::args().collect();
    let options = Options::from_args(&args);

    println!("=== Minigolf Server Load Test ===");
    println!("Clients: {}", options.clients);
    println!("Duration: {}s", options.duration_secs);
    println!("Putt rate: {}/s per client", options.putt_rate);
    println!("URL: {}", options.url);
    println!();

    let metrics = Arc::new(Metrics::default());
    let duration = Duration::from_secs(options.duration_secs);

    let spawn_start = Instant::now();
    let mut handles = Vec::with_capacity(options.clients as usize);
    for client_id in 0..options.clients {
        let url = options.url.clone();
        let metrics = Arc::clone(&metrics);
        let putt_rate = options.putt_rate;
        handles.push(tokio::spawn(async move {
            run_client(client_id, url, putt_rate, duration, metrics).await;
        }));

        // Stagger spawns slightly to avoid thundering herd
        if client_id % 50 == 49 {
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
    }
    println!("All clients spawned in {:?}", spawn_start.elapsed());
    println!();

    let stats_metrics = Arc::clone(&metrics);
    let stats_handle = tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(5));
        let start = Instant::now();
        loop {
            interval.tick().await;
            print_stats(&format!("{:3}s", start.elapsed().as_secs()), &stats_metrics);
        }
    });

    for handle in handles {
        let _ = handle.await;
    }
    stats_handle.abort();

    println!();
    println!("=== Final Results ===");
    print_stats("final", &metrics);

    let latency_sum = metrics.latency_sum_ms.load(Ordering::Relaxed);
    let latency_count = metrics.latency_count.load(Ordering::Relaxed);
    if latency_count > 0 {
        println!("Average connect latency: {}ms", latency_sum / latency_count);
    }

    let ticks = metrics.ticks_received.load(Ordering::Relaxed) as f64;
    let ticks_per_client = ticks / options.clients.max(1) as f64;
    let expected = options.duration_secs as f64 * EXPECTED_TICKS_PER_SEC;
    println!("Ticks per client: {:.1}", ticks_per_client);
    println!("Expected ticks per client: {:.1}", expected);
    if expected > 0.0 {
        println!("Delivery rate: {:.1}%", ticks_per_client / expected * 100.0);
    }
}
