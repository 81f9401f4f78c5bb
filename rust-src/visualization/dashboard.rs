//! Dashboard rendering using terminal output.

use std::collections::HashSet;

use chrono::{DateTime, Local, NaiveDate, Utc};

use crate::aggregation::{DailyUsage, PeriodTotals};
use crate::format::{format_bytes, format_bytes_short, format_date_time, mb_to_bytes};
use crate::models::{AppUsage, Period};


// Constants
const ORANGE: &str = "\x1b[38;5;208m";
const CYAN: &str = "\x1b[36m";
const RED: &str = "\x1b[31m";
const DIM: &str = "\x1b[2m";
const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";
const BAR_WIDTH: usize = 20;
const NAME_WIDTH: usize = 28;


/// Everything the usage dashboard shows.
pub struct DashboardData<'a> {
    pub totals: PeriodTotals,
    pub daily: &'a [(NaiveDate, Option<DailyUsage>)],
    pub top_consumers: &'a [AppUsage],
    pub blocked: &'a HashSet<u32>,
    pub daily_ceiling_mb: u64,
    pub last_sample: Option<DateTime<Utc>>,
}


/// Create a simple text bar for visualization.
fn create_bar(value: u64, max_value: u64, width: usize, color: &str) -> String {
    if max_value == 0 {
        return "░".repeat(width);
    }

    let filled = ((value as f64 / max_value as f64) * width as f64) as usize;
    let filled = filled.min(width);

    format!(
        "{}{}{}{}{}",
        color,
        "█".repeat(filled),
        RESET,
        DIM,
        "░".repeat(width - filled),
    ) + RESET
}


/// Shorten a name to `width` characters, marking the cut with `…`.
fn truncate_name(name: &str, width: usize) -> String {
    if name.chars().count() <= width {
        return name.to_string();
    }
    let kept: String = name.chars().take(width.saturating_sub(1)).collect();
    format!("{kept}…")
}


fn percentage(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        0.0
    } else {
        (part as f64 / whole as f64) * 100.0
    }
}


/// Render the complete dashboard.
pub fn render_dashboard(data: &DashboardData<'_>, clear_screen: bool) {
    if clear_screen {
        print!("\x1b[2J\x1b[H"); // Clear screen and move cursor to top
    }

    render_kpi_section(&data.totals, data.daily_ceiling_mb);
    println!();

    render_daily_breakdown(data.daily);
    println!();

    render_top_consumers(data.top_consumers, data.blocked);
    println!();

    render_footer(data.last_sample);
}


/// Render the period total cards and today's ceiling gauge.
fn render_kpi_section(totals: &PeriodTotals, ceiling_mb: u64) {
    let width = 28;
    let border = "─".repeat(width - 2);

    println!("┌{}┐  ┌{}┐  ┌{}┐", border, border, border);
    println!(
        "│{:^26}│  │{:^26}│  │{:^26}│",
        "Today", "This Week", "This Month"
    );
    let [today, week, month] =
        [Period::Daily, Period::Weekly, Period::Monthly].map(|p| format_bytes(totals.for_period(p).total()));
    println!(
        "│{}{}{:^26}{}│  │{}{:^26}{}│  │{}{:^26}{}│",
        BOLD, ORANGE, today, RESET, BOLD, week, RESET, BOLD, month, RESET,
    );
    println!("└{}┘  └{}┘  └{}┘", border, border, border);

    let ceiling = mb_to_bytes(ceiling_mb);
    let used = totals.today.total();
    let color = if used > ceiling { RED } else { CYAN };
    println!(
        "Daily alert {} {}{:>5.1}%{} of {}",
        create_bar(used.min(ceiling), ceiling, BAR_WIDTH * 2, color),
        color,
        percentage(used, ceiling),
        RESET,
        format_bytes_short(ceiling),
    );
}


/// Render one bar per day, oldest first.
fn render_daily_breakdown(daily: &[(NaiveDate, Option<DailyUsage>)]) {
    let max_bytes = daily
        .iter()
        .filter_map(|(_, usage)| usage.as_ref().map(|u| u.traffic.total()))
        .max()
        .unwrap_or(0);

    println!("┌────────────────────────────────────────────────────────────────────────────┐");
    println!("│ {}Daily Mobile Data{}                                                          │", BOLD, RESET);
    println!("├────────────────────────────────────────────────────────────────────────────┤");

    for (date, usage) in daily {
        let bytes = usage.as_ref().map(|u| u.traffic.total()).unwrap_or(0);
        println!(
            "│ {:<16} {} {}{:>12}{}                        │",
            date.format("%a %d/%m").to_string(),
            create_bar(bytes, max_bytes, BAR_WIDTH, ORANGE),
            ORANGE,
            format_bytes_short(bytes),
            RESET,
        );
    }

    println!("└────────────────────────────────────────────────────────────────────────────┘");
}


/// Render the top consumers table, marking blocked apps.
pub fn render_top_consumers(apps: &[AppUsage], blocked: &HashSet<u32>) {
    if apps.is_empty() {
        println!("{}No per-app data available{}", DIM, RESET);
        return;
    }

    let total: u64 = apps.iter().map(|a| a.total_bytes).sum();
    let max_bytes = apps.iter().map(|a| a.total_bytes).max().unwrap_or(0);

    println!("┌────────────────────────────────────────────────────────────────────────────┐");
    println!("│ {}Top Consumers (since boot){}                                                 │", BOLD, RESET);
    println!("├────────────────────────────────────────────────────────────────────────────┤");

    for app in apps {
        let marker = if blocked.contains(&app.uid) {
            format!("{RED}⊘{RESET}")
        } else {
            " ".to_string()
        };

        println!(
            "│{} {:<w$} {} {}{:>10}{} {}{:>5.1}%{} │",
            marker,
            truncate_name(&app.app_name, NAME_WIDTH),
            create_bar(app.total_bytes, max_bytes, BAR_WIDTH, ORANGE),
            ORANGE,
            format_bytes_short(app.total_bytes),
            RESET,
            CYAN,
            percentage(app.total_bytes, total),
            RESET,
            w = NAME_WIDTH,
        );
    }

    println!("└────────────────────────────────────────────────────────────────────────────┘");
}


/// Render the footer with the last sample time.
fn render_footer(last_sample: Option<DateTime<Utc>>) {
    match last_sample {
        Some(at) => println!(
            "{}Last sample: {}{}{}",
            DIM,
            RESET,
            CYAN,
            format_date_time(&at.with_timezone(&Local))
        ),
        None => println!("{}No samples yet. Run 'mdg sample' or 'mdg daemon'.{}", DIM, RESET),
    }
    println!("{}", RESET);

    println!(
        "{}Tip: Export history with {}{}mdg export{}",
        DIM, RESET, CYAN, RESET
    );
}
