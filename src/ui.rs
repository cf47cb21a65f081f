//! Embedded dashboard page. One HTML document, served at `/`, talking to the
//! JSON API with `fetch()`. All page state lives in the script below.

pub const DASHBOARD_HTML: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>VersionTrack</title>
    <style>
        * { margin: 0; padding: 0; box-sizing: border-box; }
        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
            background: #0f0f1a;
            color: #fff;
            min-height: 100vh;
        }
        .header {
            background: linear-gradient(135deg, #1a1a2e 0%, #16213e 100%);
            padding: 20px 30px;
            display: flex;
            justify-content: space-between;
            align-items: center;
            border-bottom: 1px solid rgba(255,255,255,0.1);
        }
        .header h1 { font-size: 24px; }
        .header span { color: #4facfe; }
        .container { padding: 30px; max-width: 1400px; margin: 0 auto; }
        .stats-grid {
            display: grid;
            grid-template-columns: repeat(auto-fit, minmax(200px, 1fr));
            gap: 20px;
            margin-bottom: 30px;
        }
        .stat-card {
            background: linear-gradient(135deg, rgba(255,255,255,0.1) 0%, rgba(255,255,255,0.05) 100%);
            padding: 25px;
            border-radius: 12px;
            border: 1px solid rgba(255,255,255,0.1);
        }
        .stat-card h3 {
            color: #888;
            font-size: 12px;
            text-transform: uppercase;
            letter-spacing: 1px;
            margin-bottom: 10px;
        }
        .stat-card .value {
            font-size: 26px;
            font-weight: 700;
            background: linear-gradient(135deg, #4facfe 0%, #00f2fe 100%);
            -webkit-background-clip: text;
            -webkit-text-fill-color: transparent;
            background-clip: text;
        }
        .stat-card .sub { color: #888; font-size: 13px; margin-top: 6px; }
        .panel {
            background: rgba(255,255,255,0.05);
            border-radius: 12px;
            border: 1px solid rgba(255,255,255,0.1);
            padding: 20px;
            margin-bottom: 30px;
        }
        .panel h2 { font-size: 18px; margin-bottom: 15px; }
        .form-row { display: flex; gap: 10px; flex-wrap: wrap; margin-bottom: 10px; }
        input, textarea, select {
            padding: 10px 14px;
            border: 1px solid rgba(255,255,255,0.2);
            border-radius: 8px;
            background: rgba(255,255,255,0.1);
            color: #fff;
            font-size: 14px;
            flex: 1;
        }
        input:focus, textarea:focus, select:focus { outline: none; border-color: #4facfe; }
        select option { background: #16213e; }
        button {
            padding: 10px 18px;
            background: linear-gradient(135deg, #4facfe 0%, #00f2fe 100%);
            border: none;
            border-radius: 8px;
            color: #fff;
            font-size: 14px;
            font-weight: 600;
            cursor: pointer;
        }
        button:hover { transform: translateY(-1px); }
        button.danger { background: linear-gradient(135deg, #f44336 0%, #ff5252 100%); }
        button.warn { background: linear-gradient(135deg, #ff9800 0%, #ffc107 100%); }
        .version-item {
            border-bottom: 1px solid rgba(255,255,255,0.05);
            padding: 14px 0;
        }
        .version-item.offline { opacity: 0.6; }
        .version-head { display: flex; justify-content: space-between; align-items: center; gap: 10px; }
        .version-head .label { font-size: 16px; font-weight: 600; }
        .version-head .meta { color: #888; font-size: 13px; }
        .badge {
            display: inline-block;
            padding: 3px 10px;
            border-radius: 4px;
            font-size: 12px;
            font-weight: 600;
        }
        .badge.online { background: rgba(76,175,80,0.2); color: #4caf50; }
        .badge.offline { background: rgba(244,67,54,0.2); color: #f44336; }
        .history { margin-top: 8px; color: #888; font-size: 13px; }
        .history div { padding: 2px 0; }
        .bug-item { border-bottom: 1px solid rgba(255,255,255,0.05); padding: 12px 0; }
        .bug-item .title { font-weight: 600; }
        .bug-item .meta { color: #888; font-size: 13px; margin-top: 4px; }
        .code-badge {
            background: rgba(79,172,254,0.2);
            color: #4facfe;
            padding: 2px 8px;
            border-radius: 4px;
            font-family: 'Monaco', 'Menlo', monospace;
            font-size: 12px;
        }
        .error-box {
            background: rgba(255,82,82,0.2);
            border: 1px solid #ff5252;
            color: #ff5252;
            padding: 10px;
            border-radius: 8px;
            margin-bottom: 12px;
            display: none;
        }
        .empty-state { padding: 30px; text-align: center; color: #666; }
        #login-overlay {
            position: fixed;
            inset: 0;
            background: linear-gradient(135deg, #1a1a2e 0%, #16213e 100%);
            display: flex;
            align-items: center;
            justify-content: center;
            z-index: 10;
        }
        .login-box {
            background: rgba(255,255,255,0.1);
            padding: 40px;
            border-radius: 16px;
            width: 100%;
            max-width: 380px;
        }
        .login-box h1 { text-align: center; margin-bottom: 20px; }
        .login-box input { width: 100%; margin-bottom: 15px; }
        .login-box button { width: 100%; }
    </style>
</head>
<body>
    <div id="login-overlay">
        <div class="login-box">
            <h1>&#128230; VersionTrack</h1>
            <div class="error-box" id="login-error">Invalid password</div>
            <input type="password" id="password" placeholder="Password"
                   onkeydown="if (event.key === 'Enter') login()">
            <button onclick="login()">Sign In</button>
        </div>
    </div>

    <div class="header">
        <h1>&#128230; VersionTrack <span>Release Dashboard</span></h1>
    </div>

    <div class="container">
        <div class="stats-grid" id="stats-grid"></div>

        <div class="panel">
            <h2>New Version</h2>
            <div class="error-box" id="version-error"></div>
            <div class="form-row">
                <input id="version-label" placeholder="Version label (e.g. 2.1.0)">
                <input id="version-date" type="datetime-local">
                <button onclick="createVersion()">Add Version</button>
            </div>
        </div>

        <div class="panel">
            <h2>Versions</h2>
            <div id="version-list"></div>
        </div>

        <div class="panel">
            <h2>Report Bug</h2>
            <div class="error-box" id="bug-error"></div>
            <div class="form-row">
                <input id="bug-title" placeholder="Title">
                <input id="bug-code" placeholder="Developer code (3 letters)" maxlength="3">
                <select id="bug-version"></select>
            </div>
            <div class="form-row">
                <textarea id="bug-description" placeholder="Description" rows="2"></textarea>
                <button onclick="createBug()">Report</button>
            </div>
        </div>

        <div class="panel">
            <h2>Bugs</h2>
            <div id="bug-list"></div>
        </div>
    </div>

    <script>
        function showError(id, message) {
            const box = document.getElementById(id);
            box.textContent = message;
            box.style.display = 'block';
            setTimeout(() => { box.style.display = 'none'; }, 4000);
        }

        async function login() {
            const password = document.getElementById('password').value;
            const res = await fetch('/api/auth', {
                method: 'POST',
                headers: { 'Content-Type': 'application/json' },
                body: JSON.stringify({ password }),
            });
            if (res.ok) {
                document.getElementById('login-overlay').style.display = 'none';
                refreshAll();
            } else {
                const data = await res.json();
                showError('login-error', data.error || 'Invalid password');
            }
        }

        function fmt(iso) {
            return new Date(iso).toLocaleString();
        }

        async function refreshAll() {
            await Promise.all([loadStats(), loadVersions(), loadBugs()]);
        }

        async function loadStats() {
            const stats = await (await fetch('/api/stats')).json();
            const cards = [];
            cards.push({ title: 'Most Bugs', value: stats.version_with_most_bugs ? stats.version_with_most_bugs.version : '—',
                         sub: stats.version_with_most_bugs ? stats.version_with_most_bugs.bug_count + ' bugs' : 'no data' });
            const top = stats.top_developers.slice(0, 3)
                .map(d => d.code + ' (' + d.count + ')').join(', ');
            cards.push({ title: 'Top Developers', value: top || '—', sub: 'by reported bugs' });
            cards.push({ title: 'Shortest Offline', value: stats.shortest_offline ? stats.shortest_offline.duration : '—',
                         sub: stats.shortest_offline ? stats.shortest_offline.version : 'no completed periods' });
            cards.push({ title: 'Fastest To Go Offline', value: stats.shortest_online ? stats.shortest_online.duration : '—',
                         sub: stats.shortest_online ? stats.shortest_online.version : 'no data' });
            cards.push({ title: 'Total Bugs', value: stats.total_bugs, sub: '' });
            cards.push({ title: 'Versions', value: stats.total_versions, sub: stats.active_versions + ' online' });
            document.getElementById('stats-grid').innerHTML = cards.map(c =>
                '<div class="stat-card"><h3>' + c.title + '</h3><div class="value">' + c.value +
                '</div><div class="sub">' + c.sub + '</div></div>').join('');
        }

        async function loadVersions() {
            const versions = await (await fetch('/api/versions')).json();

            const select = document.getElementById('bug-version');
            select.innerHTML = versions.map(v =>
                '<option value="' + v.id + '">' + v.version + '</option>').join('');

            const list = document.getElementById('version-list');
            if (versions.length === 0) {
                list.innerHTML = '<div class="empty-state">No versions yet.</div>';
                return;
            }
            list.innerHTML = versions.map(v => {
                const badge = v.is_offline
                    ? '<span class="badge offline">offline</span>'
                    : '<span class="badge online">online</span>';
                const history = v.offline_periods.map(p => {
                    const end = p.online_date ? fmt(p.online_date) : 'still offline';
                    return '<div>' + fmt(p.offline_date) + ' &rarr; ' + end + '</div>';
                }).join('');
                const total = v.total_offline_ms > 0
                    ? ' &middot; offline total ' + Math.round(v.total_offline_ms / 60000) + 'm'
                    : '';
                return '<div class="version-item' + (v.is_offline ? ' offline' : '') + '">' +
                    '<div class="version-head">' +
                    '<div><span class="label">' + v.version + '</span> ' + badge +
                    '<div class="meta">released ' + fmt(v.release_date) +
                    ' &middot; ' + v.bugs.length + ' bugs' + total + '</div></div>' +
                    '<div>' +
                    '<button class="warn" onclick="toggleOffline(\'' + v.id + '\', ' + !v.is_offline + ')">' +
                    (v.is_offline ? 'Bring Online' : 'Take Offline') + '</button> ' +
                    '<button class="danger" onclick="deleteVersion(\'' + v.id + '\')">Delete</button>' +
                    '</div></div>' +
                    (history ? '<div class="history">' + history + '</div>' : '') +
                    '</div>';
            }).join('');
        }

        async function loadBugs() {
            const bugs = await (await fetch('/api/bugs')).json();
            const list = document.getElementById('bug-list');
            if (bugs.length === 0) {
                list.innerHTML = '<div class="empty-state">No bugs reported.</div>';
                return;
            }
            list.innerHTML = bugs.map(b =>
                '<div class="bug-item"><div class="title">' + b.title +
                ' <span class="code-badge">' + b.developer_code + '</span></div>' +
                '<div class="meta">' + b.version + ' &middot; ' + fmt(b.created_at) +
                ' &middot; ' + b.description +
                ' <button class="danger" onclick="deleteBug(\'' + b.id + '\')">&times;</button></div></div>'
            ).join('');
        }

        async function createVersion() {
            const label = document.getElementById('version-label').value;
            const date = document.getElementById('version-date').value;
            const res = await fetch('/api/versions', {
                method: 'POST',
                headers: { 'Content-Type': 'application/json' },
                body: JSON.stringify({
                    version: label,
                    release_date: date ? new Date(date).toISOString() : null,
                }),
            });
            if (res.ok) {
                document.getElementById('version-label').value = '';
                document.getElementById('version-date').value = '';
                refreshAll();
            } else {
                const data = await res.json();
                showError('version-error', data.error || 'Failed to create version');
            }
        }

        async function toggleOffline(id, isOffline) {
            await fetch('/api/versions/' + id, {
                method: 'PATCH',
                headers: { 'Content-Type': 'application/json' },
                body: JSON.stringify({ is_offline: isOffline }),
            });
            refreshAll();
        }

        async function deleteVersion(id) {
            if (!confirm('Delete this version with all its bugs and history?')) return;
            await fetch('/api/versions/' + id, { method: 'DELETE' });
            refreshAll();
        }

        async function createBug() {
            const res = await fetch('/api/bugs', {
                method: 'POST',
                headers: { 'Content-Type': 'application/json' },
                body: JSON.stringify({
                    title: document.getElementById('bug-title').value,
                    description: document.getElementById('bug-description').value,
                    developer_code: document.getElementById('bug-code').value,
                    version_id: document.getElementById('bug-version').value,
                }),
            });
            if (res.ok) {
                document.getElementById('bug-title').value = '';
                document.getElementById('bug-description').value = '';
                document.getElementById('bug-code').value = '';
                refreshAll();
            } else {
                const data = await res.json();
                showError('bug-error', data.error || 'Failed to report bug');
            }
        }
    </script>
</body>
</html>"##;
