//! Static pages served by the device

/// Landing page with example command links
pub fn welcome_page(device_name: &str) -> String {
    format!(
        "Welcome to {}.<br>\
         <a href='/cmd/wifi?connect&ssid=YOUR_SSID&password=YOUR_PASSWORD'>Connect to WiFi</a><br>\
         <a href='/cmd/wifi?scan'>Scan WiFi Networks</a><br>\
         <a href='/telemetry'>Live temperature and humidity</a><br>\
         <a href='/cmd=help'>Click here for help</a>",
        escape_html(&device_name.to_uppercase())
    )
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Dashboard polling `/dht11` once per second
///
/// Values fall back to zero and the status dot turns red when no reading
/// arrived for three seconds.
pub const TELEMETRY_PAGE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>Live Temperature and Humidity</title>
<style>
body { font-family: Arial, sans-serif; background: #2f2f2f; color: white; margin: 0;
       display: flex; justify-content: center; align-items: center; height: 100vh; }
main { text-align: center; max-width: 550px; width: 100%; }
.reading { font-size: 2em; background: #171717; border: 1px solid #ddd;
           border-radius: 20px; padding: 30px; margin-bottom: 30px; }
#link { font-size: 2em; }
.online { color: green; }
.offline { color: red; }
</style>
</head>
<body>
<main>
<div id="link" class="offline">&#9679;</div>
<h1>Temp &amp; Humidity</h1>
<div id="temperature" class="reading">Fetching temperature...</div>
<div id="humidity" class="reading">Fetching humidity...</div>
</main>
<script>
const link = document.getElementById('link');
let lastUpdate = Date.now();

function show(temperature, humidity) {
  document.getElementById('temperature').innerText = `Temperature: ${temperature}`;
  document.getElementById('humidity').innerText = `Humidity: ${humidity}`;
}

function setOnline(online) {
  link.className = online ? 'online' : 'offline';
}

async function poll() {
  try {
    const response = await fetch('/dht11');
    if (!response.ok) { setOnline(false); return; }
    const data = await response.json();
    lastUpdate = Date.now();
    show(`${data.temperature}°C`, `${data.humidity}%`);
    setOnline(true);
  } catch (e) {
    setOnline(false);
  }
}

function checkStale() {
  if (Date.now() - lastUpdate >= 3000) {
    show('0', '0');
    setOnline(false);
  }
}

setInterval(poll, 1000);
setInterval(checkStale, 1000);
</script>
</body>
</html>
"#;
