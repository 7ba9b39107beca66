use std::time::{Duration, Instant};

/// Upload progress: `uploading ━━━━──── 12/40 (30%)  ETA: 8s`
#[derive(Debug, Clone)]
pub struct ProgressBar {
    total: u64,
    current: u64,
    width: u16,
    message: String,
    started: Instant,
}

impl ProgressBar {
    pub fn new(total: u64, message: impl Into<String>) -> Self {
        Self {
            total,
            current: 0,
            width: 24,
            message: message.into(),
            started: Instant::now(),
        }
    }

    pub fn set_width(&mut self, width: u16) {
        self.width = width.max(1);
    }

    pub fn inc(&mut self, delta: u64) {
        self.current = self.current.saturating_add(delta);
    }

    pub fn is_finished(&self) -> bool {
        self.current >= self.total
    }

    pub fn eta(&self) -> Option<Duration> {
        if self.total == 0 || self.current == 0 {
            return None;
        }
        if self.current >= self.total {
            return Some(Duration::ZERO);
        }

        let elapsed = self.started.elapsed().as_secs_f64();
        if elapsed <= 0.0 {
            return None;
        }

        let rate = self.current as f64 / elapsed;
        let secs = (self.total - self.current) as f64 / rate;
        if !secs.is_finite() || secs.is_sign_negative() {
            return None;
        }
        Some(Duration::from_secs_f64(secs))
    }

    pub fn render(&self, supports_unicode: bool) -> String {
        let (filled, empty) = self.bar_segments();
        let bar = if supports_unicode {
            format!("{}{}", "━".repeat(filled), "─".repeat(empty))
        } else {
            format!("{}{}", "=".repeat(filled), "-".repeat(empty))
        };

        let pct = if self.total == 0 {
            0
        } else {
            self.current.saturating_mul(100) / self.total
        };

        let mut out = String::new();
        if !self.message.is_empty() {
            out.push_str(&self.message);
            out.push(' ');
        }
        out.push_str(&bar);
        out.push_str(&format!("  {}/{} ({}%)", self.current, self.total, pct));
        if let Some(eta) = self.eta().filter(|_| !self.is_finished()) {
            out.push_str(&format!("  ETA: {}", format_duration_compact(eta)));
        }
        out
    }

    fn bar_segments(&self) -> (usize, usize) {
        let width = self.width.max(1) as usize;
        if self.total == 0 {
            return (0, width);
        }

        let ratio = self.current.min(self.total) as f64 / self.total as f64;
        let filled = (ratio * width as f64).round().clamp(0.0, width as f64) as usize;
        (filled, width - filled)
    }
}

fn format_duration_compact(d: Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        return format!("{}s", secs);
    }
    let mins = secs / 60;
    if mins < 60 {
        return format!("{}m", mins);
    }
    format!("{}h", mins / 60)
}
