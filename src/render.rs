//! HTML output. The composed view is embedded as JSON and a short script
//! turns it into Leaflet layers and controls.

use crate::compose::MapView;
use crate::config::AppConfig;
use crate::error::PipelineError;
use crate::feed::FeedFetcher;
use crate::pipeline::render_map;
use anyhow::{Context, Result};
use minijinja::{context, Environment};
use std::fs;
use std::path::Path;
use tracing::{error, info};

const LEAFLET_VERSION: &str = "1.9.4";

const BASE_TEMPLATE: &str = r#"<!doctype html>
<html lang="en">
<head>
  <meta charset="utf-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>{% block title %}Earthquake Map{% endblock %}</title>
  <link rel="stylesheet" href="https://unpkg.com/leaflet@{{ leaflet }}/dist/leaflet.css" crossorigin="" />
  <style>
    html, body { height: 100%; margin: 0; }
    #{{ container_id }} { height: 100%; width: 100%; }
    .legend { background: white; padding: 6px 10px; line-height: 20px; color: #333; border-radius: 4px; }
    .legend i { width: 18px; height: 18px; float: left; margin-right: 8px; opacity: 0.9; }
    .map-error { max-width: 40em; margin: 4em auto; padding: 1.5em 2em; font-family: sans-serif;
                 border: 1px solid #C70039; border-radius: 6px; background: #fff5f5; color: #581845; }
  </style>
  {% block head %}{% endblock %}
</head>
<body>
{% block body %}{% endblock %}
</body>
</html>
"#;

const MAP_TEMPLATE: &str = r#"{% extends "base.html" %}
{% block head %}
  <script src="https://unpkg.com/leaflet@{{ leaflet }}/dist/leaflet.js" crossorigin=""></script>
{% endblock %}
{% block body %}
<div id="{{ container_id }}"></div>
<script>
  const view = {{ view|tojson }};

  function popupContent(popup) {
    const div = document.createElement("div");
    const title = document.createElement("h3");
    title.textContent = popup.title;
    div.appendChild(title);
    div.appendChild(document.createElement("hr"));
    for (const line of popup.lines) {
      const p = document.createElement("p");
      p.textContent = line;
      div.appendChild(p);
    }
    return div;
  }

  function buildOverlay(layer) {
    if (layer.kind === "markers") {
      return L.layerGroup(layer.markers.map(function (m) {
        return L.circleMarker(m.latLng, m.style).bindPopup(function () { return popupContent(m.popup); });
      }));
    }
    return L.layerGroup(layer.lines.map(function (l) {
      const line = L.polyline(l.latLngs, layer.style);
      if (l.name) { line.bindTooltip(l.name); }
      return line;
    }));
  }

  const baseMaps = {};
  const overlayMaps = {};
  const initial = [];

  for (const base of view.baseLayers) {
    const tiles = L.tileLayer(base.tiles.url, base.tiles);
    baseMaps[base.name] = tiles;
    if (base.active) { initial.push(tiles); }
  }
  for (const overlay of view.overlays) {
    const group = buildOverlay(overlay.layer);
    overlayMaps[overlay.name] = group;
    if (overlay.visible) { initial.push(group); }
  }

  const map = L.map(view.containerId, {
    center: view.center,
    zoom: view.zoom,
    minZoom: view.minZoom,
    layers: initial
  });

  L.control.layers(baseMaps, overlayMaps, { collapsed: view.layerControl.collapsed }).addTo(map);

  const legend = L.control({ position: view.legend.position });
  legend.onAdd = function () {
    const div = L.DomUtil.create("div", "info legend");
    const title = document.createElement("strong");
    title.textContent = view.legend.title;
    div.appendChild(title);
    for (const entry of view.legend.entries) {
      const row = document.createElement("div");
      const swatch = document.createElement("i");
      swatch.style.background = entry.color;
      row.appendChild(swatch);
      row.appendChild(document.createTextNode(entry.label));
      div.appendChild(row);
    }
    return div;
  };
  legend.addTo(map);
</script>
{% endblock %}
"#;

const ERROR_TEMPLATE: &str = r#"{% extends "base.html" %}
{% block title %}Earthquake Map unavailable{% endblock %}
{% block body %}
<div id="{{ container_id }}">
  <div class="map-error" role="alert">
    <h2>The map could not be rendered</h2>
    <p>Stopped while {{ stage }}.</p>
    <pre>{{ message }}</pre>
    <p>Reload the page to try again.</p>
  </div>
</div>
{% endblock %}
"#;

fn environment() -> Result<Environment<'static>, minijinja::Error> {
    let mut env = Environment::new();
    env.add_template("base.html", BASE_TEMPLATE)?;
    env.add_template("map.html", MAP_TEMPLATE)?;
    env.add_template("error.html", ERROR_TEMPLATE)?;
    Ok(env)
}

pub fn render_page(view: &MapView) -> Result<String, minijinja::Error> {
    let env = environment()?;
    env.get_template("map.html")?.render(context! {
        leaflet => LEAFLET_VERSION,
        container_id => &view.container_id,
        view => view,
    })
}

/// Visible failure state in place of the map.
pub fn render_error_page(
    container_id: &str,
    error: &PipelineError,
) -> Result<String, minijinja::Error> {
    let env = environment()?;
    env.get_template("error.html")?.render(context! {
        leaflet => LEAFLET_VERSION,
        container_id => container_id,
        stage => error.stage.to_string(),
        message => error.source.to_string(),
    })
}

pub fn write_page(path: &Path, html: &str) -> Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create output directory: {:?}", dir))?;
    }
    fs::write(path, html).with_context(|| format!("Failed to write page: {:?}", path))?;
    Ok(())
}

/// Runs the pipeline once and writes whichever page results to `path`.
/// Returns the marker count; a failed run still writes the error page and
/// then returns the pipeline error.
pub async fn render_to_file<F: FeedFetcher>(
    config: &AppConfig,
    fetcher: &F,
    path: &Path,
) -> Result<usize> {
    match render_map(config, fetcher).await {
        Ok(view) => {
            write_page(path, &render_page(&view)?)?;
            let markers = view.marker_count();
            info!(markers, "Wrote map to {:?}", path);
            Ok(markers)
        }
        Err(e) => {
            write_page(path, &render_error_page(&config.map.container_id, &e)?)?;
            error!("Wrote error page to {:?}", path);
            Err(e.into())
        }
    }
}
