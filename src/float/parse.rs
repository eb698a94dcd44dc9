use url::Url;

/// Lines that look like IDs but are login banners or warnings
const NOISE: [&str; 3] = ["Warning", "Login", "region"];

/// Find the job ID in `float submit` output
///
/// Looks for an `id: <token>` marker first. Older CLI versions print the bare ID on its own
/// line instead, so fall back to the last line that is a long alphanumeric word.
pub fn extract_job_id(output: &str) -> Option<String> {
    marked_job_id(output).or_else(|| bare_job_id(output))
}

fn marked_job_id(output: &str) -> Option<String> {
    output.lines()
        .filter_map(|line| line.find("id:").map(|i| &line[i + "id:".len()..]))
        .find_map(|rest| rest.split_whitespace().next())
        .map(str::to_string)
}

fn bare_job_id(output: &str) -> Option<String> {
    output.lines()
        .rev()
        .map(str::trim)
        .find(|line| {
            line.len() > 15
                && line.chars().all(|c| c.is_ascii_alphanumeric())
                && !NOISE.iter().any(|noise| line.contains(noise))
        })
        .map(str::to_string)
}

/// Host of a running job from `float show` output
///
/// The address is the fourth field on the line after the last `portMappings` marker.
pub fn extract_host(show_output: &str) -> Option<String> {
    let lines: Vec<&str> = show_output.lines().collect();
    let marker = lines.iter().rposition(|line| line.contains("portMappings"))?;
    lines.get(marker + 1)?
        .split_whitespace()
        .nth(3)
        .map(str::to_string)
}

/// First line of a job log that mentions an access token
pub fn token_line(log_output: &str) -> Option<&str> {
    log_output.lines().find(|line| line.contains("token="))
}

/// `lab?token=<alphanumeric>` from a notebook server URL like `http://host:8888/lab?token=abc`
pub fn extract_lab_path(line: &str) -> Option<String> {
    const PREFIX: &str = "lab?token=";
    for (i, _) in line.match_indices("http://") {
        let rest = &line[i + "http://".len()..];
        let Some(slash) = rest.find('/') else { continue };
        if slash == 0 {
            continue;
        }
        let Some(after) = rest[slash + 1..].strip_prefix(PREFIX) else { continue };
        let token: String = after.chars().take_while(char::is_ascii_alphanumeric).collect();
        if !token.is_empty() {
            return Some(format!("{}{}", PREFIX, token));
        }
    }
    None
}

/// `http://<host>/<lab path>`, exactly as scraped
///
/// The text is only checked to parse as a URL; it is not normalised.
pub fn compose_url(host: &str, lab_path: &str) -> Result<String, url::ParseError> {
    let url = format!("http://{}/{}", host, lab_path);
    Url::parse(&url)?;
    Ok(url)
}
