use crate::models::{ChallengeResponse, DayView, DraftResponse, ParticipantView};

pub fn render_index(challenge: &ChallengeResponse) -> String {
    let sections: String = challenge.participants.iter().map(render_participant).collect();
    // `</` would end the script element early.
    let data = serde_json::to_string(challenge)
        .unwrap_or_else(|_| "null".to_string())
        .replace("</", "<\\/");

    fill(
        INDEX_HTML,
        &[
            ("AVAILABLE", challenge.available_days.to_string()),
            ("TOTAL", challenge.total_days.to_string()),
            ("PROGRESS", format!("{:.2}", challenge.progress_percent)),
            ("PROGRESS_ROUNDED", format!("{:.0}", challenge.progress_percent)),
            ("SECTIONS", sections),
            ("DATA", data),
        ],
    )
}

/// Standalone check-in page for one day, reached from the grid without
/// scripting.
pub fn render_day_page(name: &str, draft: &DraftResponse) -> String {
    fill(
        DAY_HTML,
        &[
            ("NAME", escape(name)),
            ("DAY", draft.day.to_string()),
            ("ACTION", check_in_path(&draft.participant, draft.day)),
            ("TITLE", escape(&draft.title)),
            ("SUMMARY", escape(&draft.summary)),
        ],
    )
}

/// Replaces `{{KEY}}` markers in one pass over the template; inserted
/// values are never scanned for markers.
fn fill(template: &str, values: &[(&str, String)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find("}}") else {
            out.push_str(&rest[start..]);
            return out;
        };
        let key = &after[..end];
        match values.iter().find(|(name, _)| *name == key) {
            Some((_, value)) => out.push_str(value),
            None => out.push_str(&rest[start..start + end + 4]),
        }
        rest = &after[end + 2..];
    }
    out.push_str(rest);
    out
}

fn day_path(participant: &str, day: usize) -> String {
    format!("/participants/{}/days/{day}", escape(participant))
}

fn check_in_path(participant: &str, day: usize) -> String {
    format!("{}/check-in", day_path(participant, day))
}

fn render_participant(participant: &ParticipantView) -> String {
    let cells: String = participant
        .days
        .iter()
        .map(|day| render_day(&participant.id, day))
        .collect();

    format!(
        r#"<section class="participant" data-participant="{id}">
        <h2><span>{name}</span><span class="count">{count} check-ins</span></h2>
        <form class="grid" method="get">{cells}</form>
      </section>"#,
        id = escape(&participant.id),
        name = escape(&participant.name),
        count = participant.completed_count,
    )
}

fn render_day(participant: &str, day: &DayView) -> String {
    let class = if day.completed {
        "day completed"
    } else if day.available {
        "day open"
    } else {
        "day locked"
    };

    let tooltip = match (&day.title, &day.summary) {
        (Some(title), Some(summary)) if day.completed && !summary.is_empty() => {
            format!(r#" title="{}&#10;{}""#, escape(title), escape(summary))
        }
        (Some(title), _) if day.completed => format!(r#" title="{}""#, escape(title)),
        _ => String::new(),
    };

    format!(
        r#"<button type="submit" class="{class}" formaction="{action}" data-participant="{escaped}" data-day="{number}"{disabled}{tooltip}>{number}</button>"#,
        action = day_path(participant, day.day),
        escaped = escape(participant),
        number = day.day,
        disabled = if day.available { "" } else { " disabled" },
    )
}

fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
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
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Become</title>
  <style>
    :root {
      --bg: #000000;
      --panel: #18181b;
      --cell: #27272a;
      --muted: #71717a;
      --accent: #facc15;
      --accent-soft: rgba(250, 204, 21, 0.7);
      --ink: #ffffff;
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: var(--bg);
      color: var(--ink);
      font-family: system-ui, "Segoe UI", sans-serif;
      padding: 24px 16px;
    }

    main {
      width: min(1150px, 100%);
      margin: 0 auto;
    }

    h1 {
      text-align: center;
      color: var(--accent);
      font-size: clamp(2.25rem, 6vw, 3.75rem);
      margin: 0 0 40px;
    }

    .challenge {
      max-width: 680px;
      margin: 0 auto 48px;
      color: var(--accent);
    }

    .challenge .row {
      display: flex;
      justify-content: space-between;
      margin-bottom: 12px;
    }

    .bar {
      height: 12px;
      border-radius: 999px;
      background: var(--cell);
      overflow: hidden;
    }

    .bar > div {
      height: 100%;
      background: var(--accent);
    }

    .percent {
      text-align: center;
      margin-top: 8px;
      color: var(--accent-soft);
      font-size: 0.875rem;
    }

    .participants {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(320px, 1fr));
      gap: 48px;
    }

    .participant h2 {
      display: flex;
      justify-content: space-between;
      align-items: baseline;
      color: var(--accent);
      margin: 0 0 24px;
    }

    .participant .count {
      font-size: 1rem;
      font-weight: 400;
      color: var(--accent-soft);
    }

    .grid {
      display: grid;
      grid-template-columns: repeat(6, 1fr);
      justify-items: center;
      gap: 12px 8px;
    }

    .day {
      width: 56px;
      height: 56px;
      border-radius: 50%;
      border: none;
      font-weight: 600;
      cursor: pointer;
    }

    .day.completed {
      background: var(--accent);
      color: #000;
    }

    .day.open {
      background: var(--cell);
      color: var(--muted);
    }

    .day.locked {
      background: var(--panel);
      color: #3f3f46;
      opacity: 0.4;
      cursor: not-allowed;
    }

    dialog {
      width: min(440px, calc(100% - 2rem));
      background: var(--panel);
      color: var(--ink);
      border: 1px solid rgba(250, 204, 21, 0.2);
      border-radius: 12px;
    }

    dialog h3 {
      color: var(--accent);
      margin: 0 0 4px;
    }

    dialog label {
      display: block;
      color: var(--accent);
      margin: 16px 0 6px;
    }

    dialog input,
    dialog textarea {
      width: 100%;
      background: var(--cell);
      color: var(--ink);
      border: 1px solid #3f3f46;
      border-radius: 6px;
      padding: 8px;
    }

    .actions {
      display: flex;
      gap: 12px;
      margin-top: 20px;
    }

    .actions button {
      flex: 1;
      padding: 10px;
      border-radius: 6px;
      border: 1px solid #3f3f46;
      cursor: pointer;
    }

    .primary {
      background: var(--accent);
      color: #000;
    }

    .secondary {
      background: transparent;
      color: #d4d4d8;
    }

    .congrats {
      text-align: center;
      padding: 24px 0;
    }

    .status {
      color: #f87171;
      min-height: 1.25em;
      margin-top: 8px;
    }
  </style>
</head>
<body>
  <main>
    <h1>Become</h1>

    <div class="challenge">
      <div class="row">
        <span>Challenge progress</span>
        <span id="days">{{AVAILABLE}}/{{TOTAL}} days</span>
      </div>
      <div class="bar"><div id="bar" style="width: {{PROGRESS}}%"></div></div>
      <div class="percent" id="percent">{{PROGRESS_ROUNDED}}%</div>
    </div>

    <div class="participants" id="participants">
      {{SECTIONS}}
    </div>
  </main>

  <dialog id="check-in">
    <form id="check-in-form" method="post">
      <h3 id="dialog-title">Day</h3>
      <p class="subtitle">Record what you achieved today</p>
      <label for="title">Title</label>
      <input id="title" name="title" placeholder="e.g. Finished my first workout" required />
      <label for="summary">Summary (optional)</label>
      <textarea id="summary" name="summary" rows="4" placeholder="How did your day go?"></textarea>
      <div class="status" id="status"></div>
      <div class="actions">
        <button type="button" class="secondary" id="cancel">Cancel</button>
        <button type="submit" class="primary">Confirm check-in</button>
      </div>
    </form>
    <div class="congrats" id="congrats" hidden>
      <div style="font-size: 3.5rem">🎉</div>
      <h3>Congratulations!</h3>
      <p id="congrats-text"></p>
      <button type="button" class="primary" id="continue">Continue</button>
    </div>
  </dialog>

  <script id="initial-data" type="application/json">{{DATA}}</script>
  <script>
    const dialog = document.getElementById('check-in');
    const form = document.getElementById('check-in-form');
    const congrats = document.getElementById('congrats');
    const titleInput = document.getElementById('title');
    const summaryInput = document.getElementById('summary');
    const statusEl = document.getElementById('status');
    let selected = null;
    let dirty = false;

    function renderChallenge(data) {
      document.getElementById('days').textContent = `${data.available_days}/${data.total_days} days`;
      document.getElementById('bar').style.width = `${data.progress_percent}%`;
      document.getElementById('percent').textContent = `${Math.round(data.progress_percent)}%`;

      for (const participant of data.participants) {
        const section = document.querySelector(`section[data-participant="${CSS.escape(participant.id)}"]`);
        if (!section) continue;
        section.querySelector('.count').textContent = `${participant.completed_count} check-ins`;
        for (const day of participant.days) {
          const cell = section.querySelector(`button[data-day="${day.day}"]`);
          cell.className = day.completed ? 'day completed' : day.available ? 'day open' : 'day locked';
          cell.disabled = !day.available;
          if (day.completed && day.title) {
            cell.title = day.summary ? `${day.title}\n${day.summary}` : day.title;
          } else {
            cell.removeAttribute('title');
          }
        }
      }
    }

    async function refresh() {
      const res = await fetch('/api/challenge');
      if (res.ok) {
        renderChallenge(await res.json());
      }
    }

    function dayPath(participant, day) {
      return `/api/participants/${encodeURIComponent(participant)}/days/${day}`;
    }

    async function openDay(participant, day) {
      const res = await fetch(dayPath(participant, day));
      if (!res.ok) {
        await refresh();
        return;
      }
      const draft = await res.json();
      selected = { participant, day };
      titleInput.value = draft.title;
      summaryInput.value = draft.summary;
      statusEl.textContent = '';
      document.getElementById('dialog-title').textContent = `Day ${day}`;
      form.action = `/participants/${encodeURIComponent(participant)}/days/${day}/check-in`;
      form.hidden = false;
      congrats.hidden = true;
      dialog.showModal();
    }

    function closeDialog() {
      selected = null;
      titleInput.value = '';
      summaryInput.value = '';
      dialog.close();
      if (dirty) {
        dirty = false;
        refresh();
      }
    }

    document.getElementById('participants').addEventListener('click', (event) => {
      const cell = event.target.closest('button.day');
      if (!cell || cell.disabled) return;
      event.preventDefault();
      openDay(cell.dataset.participant, Number(cell.dataset.day));
    });

    form.addEventListener('submit', async (event) => {
      event.preventDefault();
      if (!selected) return;
      if (!titleInput.value.trim()) {
        statusEl.textContent = 'A title is required.';
        return;
      }
      const res = await fetch(`${dayPath(selected.participant, selected.day)}/check-in`, {
        method: 'POST',
        headers: { 'Content-Type': 'application/json' },
        body: JSON.stringify({ title: titleInput.value, summary: summaryInput.value }),
      });
      if (!res.ok) {
        statusEl.textContent = await res.text();
        return;
      }
      const result = await res.json();
      dirty = true;
      if (result.celebrate) {
        document.getElementById('congrats-text').textContent =
          `You completed day ${result.day} of your challenge!`;
        form.hidden = true;
        congrats.hidden = false;
      } else {
        closeDialog();
      }
    });

    document.getElementById('cancel').addEventListener('click', closeDialog);
    document.getElementById('continue').addEventListener('click', closeDialog);
    dialog.addEventListener('cancel', (event) => {
      event.preventDefault();
      closeDialog();
    });

    const initial = JSON.parse(document.getElementById('initial-data').textContent);
    if (initial) {
      renderChallenge(initial);
    }
    setInterval(refresh, 60000);
  </script>
</body>
</html>
"#;

const DAY_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Day {{DAY}} · Become</title>
  <style>
    body {
      margin: 0;
      min-height: 100vh;
      background: #000000;
      color: #ffffff;
      font-family: system-ui, "Segoe UI", sans-serif;
      display: grid;
      place-items: center;
      padding: 24px 16px;
    }

    form {
      width: min(440px, 100%);
      background: #18181b;
      border: 1px solid rgba(250, 204, 21, 0.2);
      border-radius: 12px;
      padding: 24px;
    }

    h1,
    label {
      color: #facc15;
    }

    label {
      display: block;
      margin: 16px 0 6px;
    }

    input,
    textarea {
      width: 100%;
      box-sizing: border-box;
      background: #27272a;
      color: #ffffff;
      border: 1px solid #3f3f46;
      border-radius: 6px;
      padding: 8px;
    }

    .actions {
      display: flex;
      gap: 12px;
      margin-top: 20px;
    }

    .actions > * {
      flex: 1;
      padding: 10px;
      border-radius: 6px;
      text-align: center;
      text-decoration: none;
      font: inherit;
    }

    button {
      background: #facc15;
      color: #000;
      border: none;
    }

    a {
      color: #d4d4d8;
      border: 1px solid #3f3f46;
    }
  </style>
</head>
<body>
  <form method="post" action="{{ACTION}}">
    <h1>{{NAME}} · Day {{DAY}}</h1>
    <p>Record what you achieved today</p>
    <label for="title">Title</label>
    <input id="title" name="title" value="{{TITLE}}" placeholder="e.g. Finished my first workout" required />
    <label for="summary">Summary (optional)</label>
    <textarea id="summary" name="summary" rows="4" placeholder="How did your day go?">{{SUMMARY}}</textarea>
    <div class="actions">
      <a href="/">Cancel</a>
      <button type="submit">Confirm check-in</button>
    </div>
  </form>
</body>
</html>
"#;
