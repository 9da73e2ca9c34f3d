use super::*;

#[tokio::test(start_paused = true)]
async fn next_frame_should_tick_once_per_period() {
    let started_at = Instant::now();
    let mut ticker = FrameTicker::default();

    assert_eq!(ticker.next_frame().await, 1);
    assert_eq!(started_at.elapsed(), DEFAULT_FRAME_INTERVAL);
    assert_eq!(ticker.next_frame().await, 2);
    assert_eq!(started_at.elapsed(), DEFAULT_FRAME_INTERVAL * 2);
    assert_eq!(ticker.frames(), 2);
}

#[tokio::test(start_paused = true)]
async fn next_frame_should_skip_missed_ticks_after_stall() {
    let started_at = Instant::now();
    let mut ticker = FrameTicker::new(Duration::from_millis(10));

    tokio::time::advance(Duration::from_millis(55)).await;
    assert_eq!(ticker.next_frame().await, 1);
    assert_eq!(ticker.next_frame().await, 2);

    assert!(started_at.elapsed() >= Duration::from_millis(60));
}

#[test]
fn new_should_clamp_zero_period() {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .expect("runtime");
    let _entered = runtime.enter();

    assert_eq!(FrameTicker::new(Duration::ZERO).period(), Duration::from_millis(1));
}
