use axum::{http::header, response::IntoResponse, routing::get, Router};

pub fn create_static_router() -> Router {
    Router::new()
        .route("/static/css/main.css", get(serve_main_css))
        .route("/static/js/dashboard.js", get(serve_dashboard_js))
}

async fn serve_main_css() -> impl IntoResponse {
    let css = r#"
        body { font-family: system-ui, sans-serif; background: #fafafa; color: #111; }
        .dashboard { max-width: 56rem; margin: 0 auto; padding: 1.25rem; }
        h1 { font-size: 1.5rem; font-weight: 700; text-align: center; margin-bottom: 1rem; }
        .error { color: #ef4444; }
        .grid { display: grid; grid-template-columns: 1fr; gap: 1rem; }
        @media (min-width: 768px) { .grid { grid-template-columns: 1fr 1fr; } }
        .info-box { background: #f3f4f6; padding: 1rem; border-radius: 0.25rem; box-shadow: 0 1px 3px rgba(0,0,0,.1); }
        .banner { margin-top: 1rem; padding: 0.75rem; border-radius: 0.25rem; }
        .loading { background: #bfdbfe; color: #1e40af; }
        .countdown { background: #fef08a; color: #854d0e; }
        .updates { background: #bbf7d0; color: #166534; }
        [hidden] { display: none; }
    "#;

    ([(header::CONTENT_TYPE, "text/css")], css)
}

async fn serve_dashboard_js() -> impl IntoResponse {
    let js = r#"
        // Keeps the rendered dashboard in sync with the server-side poller.
        const FIELDS = ['balance', 'block_number', 'chain_id', 'nonce', 'gas_price'];

        function setBanner(id, text) {
            const el = document.getElementById(id);
            if (!el) return;
            el.textContent = text || '';
            el.hidden = !text;
        }

        function apply(snapshot) {
            for (const field of FIELDS) {
                const el = document.getElementById('value-' + field);
                if (el) el.textContent = snapshot[field] !== null ? snapshot[field] : 'Loading...';
            }
            setBanner('error', snapshot.error);
            setBanner('loading', snapshot.loading ? 'Loading...' : '');
            const secs = snapshot.next_fetch_in_secs;
            setBanner('countdown', !snapshot.loading && secs > 0 ? `Next data fetch in ${secs} seconds` : '');
            setBanner('updates', snapshot.update_count > 0 ? `Request #${snapshot.update_count} 🚀` : '');
        }

        async function refresh() {
            try {
                const response = await fetch('/api/snapshot');
                if (response.ok) apply(await response.json());
            } catch (error) {
                console.error('Failed to refresh dashboard:', error);
            }
        }

        setInterval(refresh, 1000);
    "#;

    ([(header::CONTENT_TYPE, "application/javascript")], js)
}
