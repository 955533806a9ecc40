use crate::models::{DashboardView, Scope};

pub fn render_index(view: &DashboardView) -> String {
    let aggregate = &view.aggregate;
    let device = &view.selection.device_id;

    INDEX_HTML
        .replace("{{DEVICE}}", device)
        .replace("{{RANGE}}", &range_text(&aggregate.start_date, &aggregate.end_date))
        .replace("{{TABS}}", &render_tabs(device, view.selection.scope))
        .replace("{{GOOD}}", &aggregate.totals.good.to_string())
        .replace("{{MEH}}", &aggregate.totals.meh.to_string())
        .replace("{{BAD}}", &aggregate.totals.bad.to_string())
        .replace("{{TOTAL}}", &aggregate.total.to_string())
        .replace("{{GOOD_PCT}}", &aggregate.percent.good.to_string())
        .replace("{{MEH_PCT}}", &aggregate.percent.meh.to_string())
        .replace("{{BAD_PCT}}", &aggregate.percent.bad.to_string())
        .replace("{{TEMP}}", &format!("{:.1}", aggregate.averages.temp))
        .replace("{{NOISE}}", &indicator(aggregate.noise_level.as_deref(), aggregate.averages.db, "dB"))
        .replace("{{AIR}}", &indicator(aggregate.air_quality.as_deref(), aggregate.averages.voc, "ppb"))
        .replace("{{CO2}}", &aggregate.averages.co2.to_string())
        .replace("{{SERIES}}", &render_series(view))
        .replace("{{NOTE}}", if aggregate.used_fallback { FALLBACK_NOTE } else { "" })
}

fn range_text(start: &str, end: &str) -> String {
    if start == end {
        start.to_string()
    } else {
        format!("{start} bis {end}")
    }
}

fn render_tabs(device: &str, active: Scope) -> String {
    Scope::ALL
        .iter()
        .map(|scope| {
            let class = if *scope == active { "tab active" } else { "tab" };
            format!(r#"<a class="{class}" href="/?device={device}&scope={scope}">{}</a>"#, tab_label(*scope))
        })
        .collect::<Vec<_>>()
        .join("")
}

fn tab_label(scope: Scope) -> &'static str {
    match scope {
        Scope::Now => "Jetzt",
        Scope::Day => "Tag",
        Scope::Week => "Woche",
        Scope::Month => "Monat",
        Scope::Year => "Jahr",
    }
}

/// Label plus raw number, or only the number when no band matched.
fn indicator(label: Option<&str>, value: i64, unit: &str) -> String {
    match label {
        Some(label) => format!("{label} <small>({value} {unit})</small>"),
        None => format!("{value} {unit}"),
    }
}

fn render_series(view: &DashboardView) -> String {
    let series = &view.aggregate.series;
    let max = series
        .iter()
        .map(|point| point.value)
        .fold(0.0_f64, f64::max);

    series
        .iter()
        .map(|point| {
            let height = if max > 0.0 { (point.value / max * 100.0).clamp(0.0, 100.0) } else { 0.0 };
            format!(
                r#"<div class="bar" title="{label}: {value:.1} °C"><div class="fill" style="height:{height:.0}%"></div><span>{label}</span></div>"#,
                label = point.label,
                value = point.value,
            )
        })
        .collect::<Vec<_>>()
        .join("")
}

const FALLBACK_NOTE: &str =
    r#"<p class="note">Keine Tagesdaten im Zeitraum, Gesamtwerte der Abteilung angezeigt.</p>"#;

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="de">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Stimmung & Raumklima</title>
  <style>
    html { background: #15191e; }

    body {
      margin: 0 auto;
      max-width: 1040px;
      padding: 24px 16px 40px;
      color: #d9dee4;
      font: 15px/1.4 system-ui, "Segoe UI", sans-serif;
    }

    header { border-bottom: 1px solid #2a3038; padding-bottom: 12px; }
    header h1 { margin: 0; font-size: 1.6rem; letter-spacing: 0.02em; }
    .subtitle { margin: 2px 0 0; color: #7d8793; font-size: 0.9rem; }

    .tabs { display: flex; gap: 18px; margin: 14px 0 20px; }
    .tab { color: #7d8793; text-decoration: none; padding-bottom: 4px; }
    .tab.active { color: #f0f3f6; border-bottom: 2px solid #5fb3d9; }

    .panel {
      display: grid;
      grid-template-columns: repeat(4, 1fr);
      gap: 1px;
      background: #2a3038;
      border: 1px solid #2a3038;
      margin-bottom: 18px;
    }

    @media (max-width: 640px) {
      .panel { grid-template-columns: repeat(2, 1fr); }
    }

    .stat { background: #1b2026; padding: 12px 14px; }
    .stat .label { display: block; color: #7d8793; font-size: 0.75rem; }
    .stat .value { display: block; font-size: 1.35rem; margin-top: 4px; font-variant-numeric: tabular-nums; }
    .stat small { color: #7d8793; font-size: 0.8rem; }

    .good { color: #6cc28f; }
    .meh { color: #e7c15a; }
    .bad { color: #e8735f; }

    .chart {
      display: flex;
      align-items: flex-end;
      gap: 2px;
      height: 200px;
      border-left: 1px solid #2a3038;
      border-bottom: 1px solid #2a3038;
      padding: 0 4px;
    }

    .bar { flex: 1; height: 100%; display: flex; flex-direction: column; justify-content: flex-end; }
    .bar .fill { background: #5fb3d9; min-height: 1px; }
    .bar span { color: #59626d; font-size: 0.6rem; text-align: center; margin-top: 3px; }

    .note { color: #e7c15a; font-size: 0.85rem; margin: 0 0 12px; }
  </style>
</head>
<body>
  <main>
    <header>
      <h1>{{DEVICE}}</h1>
      <p class="subtitle">{{RANGE}}</p>
    </header>

    <nav class="tabs">{{TABS}}</nav>

    <section class="panel">
      <div class="stat"><span class="label">Gut</span><span class="value good">{{GOOD}} <small>{{GOOD_PCT}}%</small></span></div>
      <div class="stat"><span class="label">Mittel</span><span class="value meh">{{MEH}} <small>{{MEH_PCT}}%</small></span></div>
      <div class="stat"><span class="label">Schlecht</span><span class="value bad">{{BAD}} <small>{{BAD_PCT}}%</small></span></div>
      <div class="stat"><span class="label">Stimmen</span><span class="value">{{TOTAL}}</span></div>
    </section>

    <section class="panel">
      <div class="stat"><span class="label">Temperatur</span><span class="value">{{TEMP}} °C</span></div>
      <div class="stat"><span class="label">Lautstärke</span><span class="value">{{NOISE}}</span></div>
      <div class="stat"><span class="label">Luftqualität</span><span class="value">{{AIR}}</span></div>
      <div class="stat"><span class="label">CO₂</span><span class="value">{{CO2}} ppm</span></div>
    </section>

    {{NOTE}}

    <section class="chart">{{SERIES}}</section>
  </main>
</body>
</html>
"#;
