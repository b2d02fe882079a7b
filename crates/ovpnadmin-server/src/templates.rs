//! HTML templates for the web UI.
//!
//! Pages are `const` template strings with `{{PLACEHOLDER}}` substitution.
//! Everything user-derived goes through [`escape_html`] before it lands in
//! a template. Search/filter and the revoke confirmation run client-side.

use chrono::NaiveDateTime;
use ovpnadmin_core::{CertStatus, ClientCert};

/// Escape a string for safe interpolation into HTML text or attributes.
#[must_use]
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
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

fn format_date(date: Option<NaiveDateTime>) -> String {
    date.map_or_else(|| "n/a".to_owned(), |d| d.format("%Y-%m-%d").to_string())
}

/// Render the login page, optionally with an error banner.
#[must_use]
pub fn render_login(error: Option<&str>) -> String {
    let alert = error.map_or_else(String::new, |msg| {
        format!(r#"<div class="alert">{}</div>"#, escape_html(msg))
    });
    format!("{LOGIN_HEAD}{}", LOGIN_BODY.replace("{{ALERT}}", &alert))
}

/// Render the dashboard.
///
/// `flash` is an optional `(message, kind)` pair where kind is `success`
/// or `error`.
#[must_use]
pub fn render_dashboard(
    username: &str,
    certs: &[ClientCert],
    flash: Option<(&str, &str)>,
) -> String {
    let active = certs.iter().filter(|c| c.status == CertStatus::Valid).count();
    let revoked = certs.iter().filter(|c| c.is_revoked()).count();

    let flash_html = flash.map_or_else(String::new, |(message, kind)| {
        let class = if kind == "success" { "alert-success" } else { "alert-error" };
        format!(
            r#"<div class="alert {class}">{}</div>"#,
            escape_html(message)
        )
    });

    let mut rows = String::new();
    for (i, cert) in certs.iter().enumerate() {
        rows.push_str(&render_row(i + 1, cert));
    }

    let body = DASH_BODY
        .replace("{{USERNAME}}", &escape_html(username))
        .replace("{{FLASH}}", &flash_html)
        .replace("{{ACTIVE}}", &active.to_string())
        .replace("{{REVOKED}}", &revoked.to_string())
        .replace("{{ROWS}}", &rows);

    format!("{DASH_HEAD}{body}")
}

fn render_row(position: usize, cert: &ClientCert) -> String {
    let name = escape_html(&cert.name);
    let badge = match cert.status {
        CertStatus::Valid => r#"<span class="badge badge-active">active</span>"#,
        CertStatus::Revoked => r#"<span class="badge badge-revoked">revoked</span>"#,
        CertStatus::Expired => r#"<span class="badge badge-expired">expired</span>"#,
    };
    let actions = if cert.status == CertStatus::Valid {
        format!(
            r#"<a href="/download/{name}" class="btn btn-sm btn-download">Download</a>
<form method="POST" action="/revoke/{name}" class="inline" onsubmit="return confirmRevoke('{name}')"><button type="submit" class="btn btn-sm btn-revoke">Revoke</button></form>"#
        )
    } else {
        r#"<span class="muted">no actions</span>"#.to_owned()
    };

    format!(
        r#"<tr><td>{position}</td><td><strong>{name}</strong></td><td class="muted">{created}</td><td class="muted">{expires}</td><td>{badge}</td><td><div class="actions">{actions}</div></td></tr>
"#,
        created = format_date(cert.created),
        expires = format_date(cert.expires),
    )
}

const LOGIN_HEAD: &str = r##"<!DOCTYPE html>
<html lang="en"><head><meta charset="utf-8"/><meta name="viewport" content="width=device-width,initial-scale=1"/>
<title>VPN Certificate Manager &mdash; Login</title>
<style>
*,*::before,*::after{box-sizing:border-box;margin:0;padding:0}
body{font-family:-apple-system,BlinkMacSystemFont,'Segoe UI',sans-serif;background:linear-gradient(135deg,#667eea 0%,#764ba2 100%);min-height:100vh;display:flex;align-items:center;justify-content:center;padding:20px}
.card{background:#fff;border-radius:16px;padding:48px 40px;width:100%;max-width:420px;box-shadow:0 20px 60px rgba(0,0,0,.3)}
h1{font-size:26px;font-weight:600;color:#1a1a1a;text-align:center;margin-bottom:8px}
.subtitle{color:#666;text-align:center;font-size:15px;margin-bottom:32px}
label{display:block;margin-bottom:8px;color:#333;font-weight:500;font-size:14px}
.field{margin-bottom:24px}
input{width:100%;padding:14px 16px;border:2px solid #e5e7eb;border-radius:10px;font-size:15px}
input:focus{outline:none;border-color:#667eea;box-shadow:0 0 0 4px rgba(102,126,234,.1)}
button{width:100%;padding:14px;background:linear-gradient(135deg,#667eea 0%,#764ba2 100%);color:#fff;border:none;border-radius:10px;font-size:16px;font-weight:600;cursor:pointer}
button:hover{filter:brightness(1.05)}
.alert{padding:14px 16px;margin-bottom:24px;border-radius:10px;background:#fee2e2;color:#991b1b;border:1px solid #fecaca;font-size:14px}
</style></head>
"##;

const LOGIN_BODY: &str = r#"<body>
<div class="card">
  <h1>VPN Certificate Manager</h1>
  <p class="subtitle">Secure access to your certificates</p>
  {{ALERT}}
  <form method="POST" action="/login">
    <div class="field"><label>Username</label><input type="text" name="username" required autofocus placeholder="Enter your username"/></div>
    <div class="field"><label>Password</label><input type="password" name="password" required placeholder="Enter your password"/></div>
    <button type="submit">Sign In</button>
  </form>
</div>
</body></html>
"#;

const DASH_HEAD: &str = r##"<!DOCTYPE html>
<html lang="en"><head><meta charset="utf-8"/><meta name="viewport" content="width=device-width,initial-scale=1"/>
<title>VPN Certificate Manager</title>
<style>
*,*::before,*::after{box-sizing:border-box;margin:0;padding:0}
body{font-family:-apple-system,BlinkMacSystemFont,'Segoe UI',sans-serif;background:#f8f9fa;color:#1a1a1a}
.header{background:#fff;border-bottom:1px solid #e5e7eb;padding:20px 0;position:sticky;top:0}
.container{max-width:1100px;margin:0 auto;padding:0 24px}
.header-row{display:flex;justify-content:space-between;align-items:center}
h1{font-size:20px;font-weight:600}
.user{display:flex;align-items:center;gap:16px;color:#666;font-size:14px}
.btn{display:inline-flex;align-items:center;padding:12px 24px;border:none;border-radius:10px;font-size:15px;font-weight:600;cursor:pointer;text-decoration:none}
.btn-sm{padding:8px 16px;font-size:14px}
.btn-primary{background:linear-gradient(135deg,#667eea 0%,#764ba2 100%);color:#fff}
.btn-logout{background:#f3f4f6;color:#374151;padding:8px 16px;border-radius:8px;font-size:14px;text-decoration:none}
.btn-download{background:#3b82f6;color:#fff}
.btn-revoke{background:#ef4444;color:#fff}
.main{padding:32px 0}
.stats{display:grid;grid-template-columns:repeat(auto-fit,minmax(240px,1fr));gap:20px;margin-bottom:32px}
.stat{background:#fff;border-radius:12px;padding:24px;border:1px solid #e5e7eb}
.stat-value{font-size:36px;font-weight:700;color:#667eea;margin-bottom:8px}
.stat-label{color:#666;font-size:14px;font-weight:500}
.card{background:#fff;border-radius:12px;padding:24px;border:1px solid #e5e7eb;margin-bottom:24px}
h2{font-size:18px;font-weight:600;margin-bottom:20px}
.form-row{display:flex;gap:12px}
.form-row input{flex:1;padding:12px 16px;border:2px solid #e5e7eb;border-radius:10px;font-size:15px}
.alert{padding:14px 16px;border-radius:10px;margin-bottom:24px;font-size:14px;font-weight:500}
.alert-success{background:#d1fae5;color:#065f46;border:1px solid #a7f3d0}
.alert-error{background:#fee2e2;color:#991b1b;border:1px solid #fecaca}
.loading{display:none;padding:12px;background:#fef3c7;border-radius:8px;margin-top:12px;font-size:14px;color:#92400e}
.search{width:100%;padding:12px 16px;border:2px solid #e5e7eb;border-radius:10px;font-size:15px;margin-bottom:20px}
table{width:100%;border-collapse:collapse}
th{padding:12px 16px;text-align:left;font-size:13px;font-weight:600;color:#6b7280;text-transform:uppercase;border-bottom:1px solid #e5e7eb}
td{padding:16px;border-bottom:1px solid #f3f4f6;font-size:14px}
tr:hover td{background:#f9fafb}
.badge{display:inline-flex;padding:4px 12px;border-radius:20px;font-size:13px;font-weight:600}
.badge-active{background:#d1fae5;color:#065f46}
.badge-revoked{background:#fee2e2;color:#991b1b}
.badge-expired{background:#fef3c7;color:#92400e}
.actions{display:flex;gap:8px}
.inline{display:inline}
.muted{color:#9ca3af;font-size:13px}
</style>
<script>
function filterTable(){
  const filter=document.getElementById('search').value.toUpperCase();
  const rows=document.getElementById('certs').getElementsByTagName('tr');
  for(let i=1;i<rows.length;i++){
    const cells=rows[i].getElementsByTagName('td');
    if(cells.length>0){
      const text=cells[1].textContent||cells[1].innerText;
      rows[i].style.display=text.toUpperCase().indexOf(filter)>-1?'':'none';
    }
  }
}
function showLoading(){document.getElementById('loading').style.display='block';return true}
function confirmRevoke(name){return confirm('Are you sure you want to revoke the certificate for "'+name+'"?\n\nThis action cannot be undone!')}
</script></head>
"##;

const DASH_BODY: &str = r#"<body>
<div class="header"><div class="container"><div class="header-row">
  <h1>VPN Certificate Manager</h1>
  <div class="user"><span>{{USERNAME}}</span><a href="/logout" class="btn-logout">Sign Out</a></div>
</div></div></div>
<div class="main"><div class="container">
  {{FLASH}}
  <div class="stats">
    <div class="stat"><div class="stat-value">{{ACTIVE}}</div><div class="stat-label">Active Certificates</div></div>
    <div class="stat"><div class="stat-value">{{REVOKED}}</div><div class="stat-label">Revoked Certificates</div></div>
  </div>
  <div class="card">
    <h2>Create New Certificate</h2>
    <form method="POST" action="/create" onsubmit="return showLoading()">
      <div class="form-row">
        <input type="text" name="client_name" placeholder="Enter client name (e.g., john-doe)" required pattern="[a-zA-Z0-9_.-]+" title="Only letters, numbers, underscore, dot and dash"/>
        <button type="submit" class="btn btn-primary">Create Certificate</button>
      </div>
    </form>
    <div id="loading" class="loading">Creating certificate, please wait&hellip;</div>
  </div>
  <div class="card">
    <h2>All Certificates ({{ACTIVE}} active + {{REVOKED}} revoked)</h2>
    <input type="text" id="search" class="search" onkeyup="filterTable()" placeholder="Search certificates&hellip;"/>
    <table id="certs">
      <thead><tr><th>#</th><th>Client Name</th><th>Created</th><th>Expires</th><th>Status</th><th>Actions</th></tr></thead>
      <tbody>
{{ROWS}}
      </tbody>
    </table>
  </div>
</div></div>
</body></html>
"#;
