use crate::dashboard::{DashboardState, Tab};
use crate::models::{Badge, DailyLog, Document, MetricProgress, Milestone};
use crate::stats::{
    consecutive_streak, last_n_days, quote_of_the_day, today_metrics, weekly_summary,
    DEFAULT_WINDOW,
};
use std::fmt::Write;

pub fn render_dashboard(state: &DashboardState) -> String {
    let body = match &state.document {
        Some(document) => render_tabs(state, document),
        None => r#"<p class="empty">No data available.</p>"#.to_string(),
    };

    INDEX_HTML
        .replace("{{NAV}}", &render_nav(state.active_tab))
        .replace("{{BODY}}", &body)
        .replace("{{MODAL}}", &render_modal(state.modal.as_deref()))
}

fn render_nav(active: Tab) -> String {
    let mut nav = String::new();
    for tab in Tab::ALL {
        let class = if tab == active { "nav-tab active" } else { "nav-tab" };
        let _ = write!(
            nav,
            r#"<a class="{class}" href="/?tab={id}">{label}</a>"#,
            id = tab.id(),
            label = tab.label()
        );
    }
    nav
}

fn render_tabs(state: &DashboardState, document: &Document) -> String {
    let last_week = last_n_days(document, DEFAULT_WINDOW, state.today);
    let sections = [
        (Tab::Overview, render_overview(state, document, &last_week)),
        (Tab::Daily, render_daily_form(state)),
        (Tab::Weekly, render_weekly(&last_week)),
        (Tab::Milestones, render_milestones(&document.monthly_milestones)),
        (Tab::Achievements, render_badges(&document.achievement_badges)),
    ];

    let mut html = String::new();
    for (tab, content) in sections {
        let class = if tab == state.active_tab { "tab-content active" } else { "tab-content" };
        let _ = write!(html, r#"<section id="{}" class="{class}">{content}</section>"#, tab.id());
    }
    html
}

fn render_overview(state: &DashboardState, document: &Document, last_week: &[DailyLog]) -> String {
    let profile = &document.user_profile;
    let metrics = today_metrics(document, state.today);
    let quote = quote_of_the_day(&document.motivational_quotes, state.today).unwrap_or("");
    let streak = consecutive_streak(&document.daily_logs, state.today);
    let exercise = if metrics.exercise_done {
        format!("Done ({})", escape_html(&metrics.exercise_type))
    } else {
        "Not yet".to_string()
    };

    let mut html = String::new();
    let _ = write!(
        html,
        r#"<div class="panel">
  {month}{days}{logged}{streak}
</div>
<blockquote class="quote">{quote}</blockquote>
<div class="panel">
  {deep}{screen}
  <div class="stat"><span class="label">Exercise</span><span class="value">{exercise}</span></div>
  <div class="stat"><span class="label">Sleep</span><span class="value">{sleep:.1}h</span><span class="hint">Quality {quality}</span></div>
</div>
<div class="chart-card"><h2>Last 7 days</h2>{chart}</div>"#,
        month = stat("Month", &profile.current_month.to_string()),
        days = stat("Days completed", &profile.days_completed.to_string()),
        logged = stat("Logged days", &profile.streak_count.to_string()),
        streak = stat("Current streak", &streak.to_string()),
        quote = escape_html(quote),
        deep = progress_card("Deep work", "h", &metrics.deep_work, false),
        screen = progress_card("Screen time", "h", &metrics.screen_time, true),
        sleep = metrics.sleep_hours,
        quality = metrics.sleep_quality,
        chart = render_line_chart(
            &day_labels(last_week),
            &[
                Series::new("Deep Work (h)", "#1FB8CD", last_week, |log| log.deep_work_hours),
                Series::new("Screen Time (h)", "#B4413C", last_week, |log| log.phone_screen_time),
                Series::new("Sleep (h)", "#FFC185", last_week, |log| log.sleep_hours),
            ],
        ),
    );
    html
}

fn stat(label: &str, value: &str) -> String {
    format!(
        r#"<div class="stat"><span class="label">{}</span><span class="value">{}</span></div>"#,
        escape_html(label),
        escape_html(value)
    )
}

/// `lower_is_better` metrics turn red once over target instead of green.
fn progress_card(label: &str, unit: &str, progress: &MetricProgress, lower_is_better: bool) -> String {
    let class = match (lower_is_better, progress.over_target) {
        (true, true) => "warning",
        (false, _) if progress.ratio >= 1.0 => "success",
        _ => "",
    };
    format!(
        r#"<div class="stat {class}"><span class="label">{label}</span><span class="value">{value:.1}{unit}</span><div class="bar"><div class="fill" style="width: {width:.0}%"></div></div><span class="hint">Target {target}{unit}</span></div>"#,
        value = progress.value,
        width = progress.ratio * 100.0,
        target = progress.target,
    )
}

fn render_daily_form(state: &DashboardState) -> String {
    let fallback = DailyLog::placeholder(String::new());
    let log = state.today_log().unwrap_or(&fallback);
    let selected = |flag: bool, value: bool| if flag == value { " selected" } else { "" };

    format!(
        r#"<form class="log-form" method="post" action="/log">
  <input type="hidden" name="date" value="{date}" />
  <label>Deep work (hours)<input type="number" step="0.5" min="0" name="deep_work_hours" value="{deep}" /></label>
  <label>Phone screen time (hours)<input type="number" step="0.1" min="0" name="phone_screen_time" value="{screen}" /></label>
  <label>Exercise<select name="exercise_done"><option value="false"{ex_no}>No</option><option value="true"{ex_yes}>Yes</option></select></label>
  <label>Exercise type<input type="text" name="exercise_type" value="{ex_type}" /></label>
  <label>Sleep (hours)<input type="number" step="0.5" min="0" name="sleep_hours" value="{sleep}" /></label>
  <label>Sleep quality (1-5)<input type="number" min="1" max="5" name="sleep_quality" value="{quality}" /></label>
  <label>Mood (1-10)<input type="number" min="1" max="10" name="mood_score" value="{mood}" /></label>
  <label>Meditation<select name="meditation_done"><option value="false"{med_no}>No</option><option value="true"{med_yes}>Yes</option></select></label>
  <label>Notes<textarea name="notes">{notes}</textarea></label>
  <button type="submit">Save today</button>
</form>"#,
        date = escape_html(&crate::stats::date_key(state.today)),
        deep = log.deep_work_hours,
        screen = log.phone_screen_time,
        ex_no = selected(log.exercise_done, false),
        ex_yes = selected(log.exercise_done, true),
        ex_type = escape_html(&log.exercise_type),
        sleep = log.sleep_hours,
        quality = log.sleep_quality,
        mood = log.mood_score,
        med_no = selected(log.meditation_done, false),
        med_yes = selected(log.meditation_done, true),
        notes = escape_html(&log.notes),
    )
}

fn render_weekly(last_week: &[DailyLog]) -> String {
    let summary = weekly_summary(last_week);
    format!(
        r#"<div class="panel">
  {deep}{exercise}{sleep}{mood}
</div>
<div class="chart-card"><h2>Mood score</h2>{chart}</div>"#,
        deep = stat("Avg deep work", &format!("{:.1}h", summary.avg_deep_work_hours)),
        exercise = stat("Exercise", &format!("{}/{}", summary.exercise_days, summary.days)),
        sleep = stat("Avg sleep", &format!("{:.1}h", summary.avg_sleep_hours)),
        mood = stat("Avg mood", &format!("{:.1}", summary.avg_mood_score)),
        chart = render_bar_chart(
            &day_labels(last_week),
            &last_week.iter().map(|log| log.mood_score).collect::<Vec<_>>(),
            "#5D878F",
            10.0,
        ),
    )
}

fn render_milestones(milestones: &[Milestone]) -> String {
    let mut html = String::new();
    for milestone in milestones {
        let mut goals = String::new();
        for goal in &milestone.key_goals {
            let _ = write!(
                goals,
                r#"<div class="goal-item"><span>{text}</span><div class="bar"><div class="fill" style="width: {progress:.0}%"></div></div><span>{mark}</span></div>"#,
                text = escape_html(&goal.goal),
                progress = goal.progress.clamp(0.0, 100.0),
                mark = if goal.completed { "✅" } else { "⏳" },
            );
        }
        let _ = write!(
            html,
            r#"<article class="milestone" style="border-color: {color}">
  <header><h3>Month {month}: {title}</h3><span class="status status--{class}">{status}</span><span class="value">{rate:.0}%</span></header>
  {goals}
</article>"#,
            color = escape_html(&milestone.color),
            month = milestone.month,
            title = escape_html(&milestone.title),
            class = milestone.status.css_class(),
            status = escape_html(milestone.status.label()),
            rate = milestone.completion_rate,
        );
    }
    html
}

fn render_badges(badges: &[Badge]) -> String {
    let mut html = String::from(r#"<div class="panel">"#);
    for badge in badges {
        let _ = write!(
            html,
            r#"<div class="stat badge {class}"><span class="value">{icon}</span><span class="label">{name}</span><span class="hint">{description}</span></div>"#,
            class = if badge.earned { "earned" } else { "locked" },
            icon = escape_html(&badge.icon),
            name = escape_html(&badge.name),
            description = escape_html(&badge.description),
        );
    }
    html.push_str("</div>");
    html
}

fn render_modal(message: Option<&str>) -> String {
    match message {
        Some(text) => format!(
            r#"<div class="modal" id="modal"><div class="modal-body"><p>{}</p><button type="button" class="modal-close">Close</button></div></div>"#,
            escape_html(text).replace('\n', "<br />")
        ),
        None => String::new(),
    }
}

fn day_labels(days: &[DailyLog]) -> Vec<String> {
    days.iter()
        .map(|log| log.date.get(5..).unwrap_or(&log.date).to_string())
        .collect()
}

struct Series<'a> {
    label: &'a str,
    color: &'a str,
    values: Vec<f64>,
}

impl<'a> Series<'a> {
    fn new(label: &'a str, color: &'a str, days: &[DailyLog], pick: fn(&DailyLog) -> f64) -> Self {
        Self {
            label,
            color,
            values: days.iter().map(pick).collect(),
        }
    }
}

const CHART_WIDTH: f64 = 600.0;
const CHART_HEIGHT: f64 = 260.0;
const PADDING_X: f64 = 44.0;
const PADDING_Y: f64 = 34.0;
const TOP: f64 = 24.0;

fn render_line_chart(labels: &[String], series: &[Series<'_>]) -> String {
    if labels.is_empty() {
        return empty_chart();
    }

    let max = series
        .iter()
        .flat_map(|s| s.values.iter().copied())
        .fold(0.0_f64, f64::max);
    let max = if max <= 0.0 { 1.0 } else { max };

    let x_step = if labels.len() > 1 {
        (CHART_WIDTH - PADDING_X * 2.0) / (labels.len() - 1) as f64
    } else {
        0.0
    };
    let scale_y = (CHART_HEIGHT - TOP - PADDING_Y) / max;
    let x = |index: usize| PADDING_X + index as f64 * x_step;
    let y = |value: f64| CHART_HEIGHT - PADDING_Y - value.max(0.0) * scale_y;

    let mut svg = chart_open();
    svg.push_str(&grid(max, y));

    for (position, line) in series.iter().enumerate() {
        let path = line
            .values
            .iter()
            .enumerate()
            .map(|(index, value)| {
                let command = if index == 0 { 'M' } else { 'L' };
                format!("{command} {:.2} {:.2}", x(index), y(*value))
            })
            .collect::<Vec<_>>()
            .join(" ");
        let _ = write!(
            svg,
            r#"<path class="chart-line" stroke="{color}" d="{path}" /><text class="chart-label" x="{lx}" y="14" fill="{color}">{label}</text>"#,
            color = line.color,
            lx = PADDING_X + position as f64 * 150.0,
            label = escape_html(line.label),
        );
        for (index, value) in line.values.iter().enumerate() {
            let _ = write!(
                svg,
                r#"<circle class="chart-point" stroke="{}" cx="{:.2}" cy="{:.2}" r="4" />"#,
                line.color,
                x(index),
                y(*value)
            );
        }
    }

    svg.push_str(&x_labels(labels, x));
    svg.push_str("</svg>");
    svg
}

fn render_bar_chart(labels: &[String], values: &[f64], color: &str, max: f64) -> String {
    if labels.is_empty() {
        return empty_chart();
    }

    let max = values.iter().copied().fold(max, f64::max);
    let slot = (CHART_WIDTH - PADDING_X * 2.0) / labels.len() as f64;
    let bar_width = slot * 0.6;
    let scale_y = (CHART_HEIGHT - TOP - PADDING_Y) / max;
    let y = |value: f64| CHART_HEIGHT - PADDING_Y - value.max(0.0) * scale_y;
    let center = |index: usize| PADDING_X + slot * (index as f64 + 0.5);

    let mut svg = chart_open();
    svg.push_str(&grid(max, y));
    for (index, value) in values.iter().enumerate() {
        let top = y(*value);
        let _ = write!(
            svg,
            r#"<rect x="{:.2}" y="{top:.2}" width="{bar_width:.2}" height="{:.2}" rx="4" fill="{color}" />"#,
            center(index) - bar_width / 2.0,
            CHART_HEIGHT - PADDING_Y - top,
        );
    }
    svg.push_str(&x_labels(labels, center));
    svg.push_str("</svg>");
    svg
}

fn chart_open() -> String {
    format!(
        r#"<svg class="chart" viewBox="0 0 {CHART_WIDTH} {CHART_HEIGHT}" role="img" aria-label="chart">"#
    )
}

fn empty_chart() -> String {
    format!(
        r#"{}<text class="chart-label" x="50%" y="50%" text-anchor="middle">No data yet</text></svg>"#,
        chart_open()
    )
}

fn grid(max: f64, y: impl Fn(f64) -> f64) -> String {
    const TICKS: u32 = 4;
    let mut out = String::new();
    for tick in 0..=TICKS {
        let value = max * f64::from(tick) / f64::from(TICKS);
        let y_pos = y(value);
        let _ = write!(
            out,
            r#"<line class="chart-grid" x1="{PADDING_X}" y1="{y_pos:.2}" x2="{x2}" y2="{y_pos:.2}" /><text class="chart-label" x="{lx}" y="{ly:.2}" text-anchor="end">{value}</text>"#,
            x2 = CHART_WIDTH - PADDING_X,
            lx = PADDING_X - 10.0,
            ly = y_pos + 4.0,
            value = format_axis_value(value),
        );
    }
    out
}

fn x_labels(labels: &[String], x: impl Fn(usize) -> f64) -> String {
    let every = if labels.len() > 8 { 2 } else { 1 };
    let mut out = String::new();
    for (index, label) in labels.iter().enumerate().step_by(every) {
        let _ = write!(
            out,
            r#"<text class="chart-label" x="{:.2}" y="{:.2}" text-anchor="middle">{}</text>"#,
            x(index),
            CHART_HEIGHT - PADDING_Y + 18.0,
            escape_html(label)
        );
    }
    out
}

fn format_axis_value(value: f64) -> String {
    let rounded = (value * 10.0).round() / 10.0;
    if rounded.fract() == 0.0 {
        format!("{rounded:.0}")
    } else {
        format!("{rounded:.1}")
    }
}

pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en" data-color-scheme="light">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Monk Mode Dashboard</title>
  <style>
    :root {
      --bg: #fcfcf9;
      --card: #ffffff;
      --ink: #13343b;
      --muted: #626c71;
      --primary: #21808d;
      --success: #2d7a4b;
      --warning: #c63b2b;
      --border: rgba(94, 82, 64, 0.16);
    }

    [data-color-scheme="dark"] {
      --bg: #1f2121;
      --card: #262828;
      --ink: #f5f5f5;
      --muted: #a7a9a9;
      --primary: #32b8c6;
      --border: rgba(119, 124, 124, 0.3);
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      background: var(--bg);
      color: var(--ink);
      font-family: "Space Grotesk", "Trebuchet MS", sans-serif;
      padding: 24px 18px 48px;
    }

    .app {
      width: min(960px, 100%);
      margin: 0 auto;
      display: grid;
      gap: 24px;
    }

    header.top {
      display: flex;
      justify-content: space-between;
      align-items: center;
      gap: 12px;
    }

    nav {
      display: flex;
      flex-wrap: wrap;
      gap: 6px;
    }

    .nav-tab {
      padding: 8px 14px;
      border-radius: 999px;
      color: var(--muted);
      text-decoration: none;
      font-weight: 600;
    }

    .nav-tab.active {
      background: var(--card);
      color: var(--primary);
      box-shadow: 0 8px 16px rgba(47, 72, 88, 0.12);
    }

    .tab-content {
      display: none;
      gap: 16px;
    }

    .tab-content.active {
      display: grid;
    }

    .panel {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(180px, 1fr));
      gap: 16px;
    }

    .stat,
    .chart-card,
    .milestone {
      background: var(--card);
      border: 1px solid var(--border);
      border-radius: 18px;
      padding: 18px;
      display: grid;
      gap: 8px;
    }

    .stat .label {
      font-size: 0.85rem;
      text-transform: uppercase;
      letter-spacing: 0.12em;
      color: var(--muted);
    }

    .stat .value {
      font-size: 1.6rem;
      font-weight: 600;
    }

    .stat.success .value {
      color: var(--success);
    }

    .stat.warning .value {
      color: var(--warning);
    }

    .hint {
      color: var(--muted);
      font-size: 0.9rem;
    }

    .bar {
      height: 8px;
      border-radius: 999px;
      background: var(--border);
      overflow: hidden;
    }

    .bar .fill {
      height: 100%;
      background: var(--primary);
    }

    .quote {
      margin: 0;
      font-style: italic;
      color: var(--muted);
    }

    .chart {
      width: 100%;
      height: 260px;
    }

    .chart-line {
      fill: none;
      stroke-width: 3;
    }

    .chart-point {
      fill: var(--card);
      stroke-width: 2;
    }

    .chart-grid {
      stroke: var(--border);
    }

    .chart-label {
      fill: var(--muted);
      font-size: 11px;
    }

    .log-form {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(220px, 1fr));
      gap: 14px;
    }

    .log-form label {
      display: grid;
      gap: 6px;
      color: var(--muted);
    }

    button {
      border: none;
      border-radius: 999px;
      padding: 12px 18px;
      font-weight: 600;
      background: var(--primary);
      color: white;
      cursor: pointer;
    }

    .milestone {
      border-left-width: 6px;
    }

    .milestone header {
      display: flex;
      gap: 12px;
      align-items: center;
      justify-content: space-between;
    }

    .goal-item {
      display: grid;
      grid-template-columns: 1fr 140px 24px;
      gap: 10px;
      align-items: center;
    }

    .status--success {
      color: var(--success);
    }

    .status--warning {
      color: #a84b2f;
    }

    .badge.locked {
      opacity: 0.45;
    }

    .modal {
      position: fixed;
      inset: 0;
      background: rgba(0, 0, 0, 0.4);
      display: grid;
      place-items: center;
    }

    .modal.hidden {
      display: none;
    }

    .modal-body {
      background: var(--card);
      border-radius: 18px;
      padding: 24px;
      max-width: 420px;
    }
  </style>
</head>
<body>
  <main class="app">
    <header class="top">
      <h1>Monk Mode</h1>
      <div>
        <a class="nav-tab" href="/api/export">Export</a>
        <button type="button" id="themeToggle">🌙 Dark</button>
      </div>
    </header>
    <nav>{{NAV}}</nav>
    {{BODY}}
  </main>
  {{MODAL}}
  <script>
    const root = document.documentElement;
    const themeButton = document.getElementById('themeToggle');

    const applyTheme = (theme) => {
      root.setAttribute('data-color-scheme', theme);
      themeButton.textContent = theme === 'dark' ? '☀️ Light' : '🌙 Dark';
    };

    const savedTheme = localStorage.getItem('theme');
    if (savedTheme) {
      applyTheme(savedTheme);
    }

    themeButton.addEventListener('click', () => {
      const next = root.getAttribute('data-color-scheme') === 'dark' ? 'light' : 'dark';
      applyTheme(next);
      localStorage.setItem('theme', next);
    });

    const modal = document.getElementById('modal');
    if (modal) {
      modal.querySelector('.modal-close').addEventListener('click', () => {
        modal.classList.add('hidden');
      });
    }
  </script>
</body>
</html>
"#;
