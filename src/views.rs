//! Server-rendered pages. Kept deliberately plain: the JSON API carries the
//! behaviour, these only present it.

use crate::model::attendance::{AttendanceStatus, DashboardSummary, TodayAttendance};
use crate::model::employee::Employee;
use chrono::NaiveDate;
use std::fmt::Write;
use strum::IntoEnumIterator;

const STYLE: &str = r#"
body { font-family: sans-serif; margin: 2rem auto; max-width: 960px; color: #1f2937; }
nav a { margin-right: 1rem; }
table { border-collapse: collapse; width: 100%; margin-top: 1rem; }
th, td { border-bottom: 1px solid #e5e7eb; padding: .5rem; text-align: left; }
.cards { display: flex; gap: 1rem; }
.card { flex: 1; padding: 1rem; border: 1px solid #e5e7eb; border-radius: .5rem; }
.card strong { display: block; font-size: 2rem; }
.badge-present { color: #166534; }
.badge-permission { color: #1e40af; }
.badge-sick { color: #9a3412; }
.badge-leave { color: #6b21a8; }
.badge-other { color: #374151; }
"#;

pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

fn layout(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title} · Presensi</title>
<style>{STYLE}</style>
</head>
<body>
<nav><a href="/">Home</a><a href="/presensi">Check in / out</a><a href="/dashboard">Dashboard</a></nav>
<h1>{title}</h1>
{body}
</body>
</html>"#,
        title = escape(title),
    )
}

fn opt(value: Option<&str>) -> String {
    value.map(escape).unwrap_or_else(|| "-".to_string())
}

pub fn index() -> String {
    layout(
        "Employee Attendance",
        r#"<p>Record daily check-in and check-out, and follow today's attendance.</p>
<div class="cards">
<div class="card">Employees <strong id="totalEmployees">-</strong></div>
<div class="card">Present today <strong id="presentToday">-</strong></div>
<div class="card">Records <strong id="totalRecords">-</strong></div>
<div class="card">Attendance rate <strong id="attendanceRate">-</strong></div>
</div>
<script>
fetch('/api/dashboard/stats').then(r => r.json()).then(s => {
  document.getElementById('totalEmployees').textContent = s.total_employees;
  document.getElementById('presentToday').textContent = s.present_today;
  document.getElementById('totalRecords').textContent = s.total_records;
  document.getElementById('attendanceRate').textContent = s.attendance_rate + '%';
});
</script>"#,
    )
}

pub fn presensi(employees: &[Employee]) -> String {
    let mut body = String::new();

    body.push_str(r#"<form id="attendanceForm" onsubmit="return false">"#);
    body.push_str(r#"<label>Employee <select id="employee"><option value="">Select...</option>"#);
    for e in employees {
        let _ = write!(
            body,
            r#"<option value="{}">{} ({})</option>"#,
            e.id,
            escape(&e.name),
            opt(e.division.as_deref())
        );
    }
    body.push_str("</select></label>\n");

    body.push_str(r#"<label>Status <select id="status">"#);
    for status in AttendanceStatus::iter() {
        let _ = write!(body, r#"<option value="{status}">{status}</option>"#);
    }
    body.push_str("</select></label>\n");
    body.push_str(
        r#"<label>Note <input id="note" type="text"></label>
<label>Location <input id="location" type="text" placeholder="Office"></label>
<button type="button" onclick="send('/api/checkin', true)">Check In</button>
<button type="button" onclick="send('/api/checkout', false)">Check Out</button>
</form>
<p id="message"></p>
<table id="history"><thead><tr><th>Date</th><th>Check in</th><th>Check out</th><th>Status</th></tr></thead><tbody></tbody></table>
"#,
    );

    body.push_str("<h2>Employees</h2>\n<table><thead><tr><th>Name</th><th>Email</th><th>Division</th></tr></thead><tbody>\n");
    if employees.is_empty() {
        body.push_str(r#"<tr><td colspan="3">No employees found</td></tr>"#);
    }
    for e in employees {
        let _ = writeln!(
            body,
            "<tr><td>{}</td><td>{}</td><td>{}</td></tr>",
            escape(&e.name),
            escape(&e.email),
            opt(e.division.as_deref())
        );
    }
    body.push_str("</tbody></table>\n");

    body.push_str(
        r#"<script>
const employee = document.getElementById('employee');
async function loadHistory() {
  const tbody = document.querySelector('#history tbody');
  tbody.innerHTML = '';
  if (!employee.value) return;
  const rows = await (await fetch('/api/presensi/' + employee.value)).json();
  for (const r of rows) {
    const tr = document.createElement('tr');
    for (const v of [r.date, r.check_in, r.check_out, r.status]) {
      const td = document.createElement('td');
      td.textContent = v ?? '-';
      tr.appendChild(td);
    }
    tbody.appendChild(tr);
  }
}
async function send(url, full) {
  if (!employee.value) { document.getElementById('message').textContent = 'Select an employee first'; return; }
  const data = { employee_id: parseInt(employee.value, 10) };
  if (full) {
    data.status = document.getElementById('status').value;
    data.note = document.getElementById('note').value;
    data.location = document.getElementById('location').value;
  }
  const res = await fetch(url, { method: 'POST', headers: { 'Content-Type': 'application/json' }, body: JSON.stringify(data) });
  const out = await res.json();
  document.getElementById('message').textContent = out.message ?? out.error;
  loadHistory();
}
employee.addEventListener('change', loadHistory);
</script>"#,
    );

    layout("Check in / out", &body)
}

pub fn dashboard(summary: &DashboardSummary, rows: &[TodayAttendance], today: NaiveDate) -> String {
    let mut body = String::new();

    let _ = write!(
        body,
        r#"<p>{}</p>
<div class="cards">
<div class="card">Present <strong>{}</strong></div>
<div class="card">Employees <strong>{}</strong></div>
<div class="card">Not present <strong>{}</strong></div>
</div>
"#,
        today.format("%d %B %Y"),
        summary.total_present,
        summary.total_employees,
        summary.total_absent_variant
    );

    body.push_str("<table><thead><tr><th>Name</th><th>Division</th><th>Check in</th><th>Check out</th><th>Status</th><th>Note</th></tr></thead><tbody>\n");
    if rows.is_empty() {
        body.push_str(r#"<tr><td colspan="6">No attendance recorded today</td></tr>"#);
    }
    for r in rows {
        let _ = writeln!(
            body,
            r#"<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td class="{}">{}</td><td>{}</td></tr>"#,
            escape(&r.name),
            opt(r.division.as_deref()),
            opt(r.check_in.as_deref()),
            opt(r.check_out.as_deref()),
            AttendanceStatus::badge_class(&r.status),
            escape(&r.status),
            opt(r.note.as_deref().filter(|n| !n.is_empty()))
        );
    }
    body.push_str("</tbody></table>\n");

    layout("Dashboard", &body)
}
