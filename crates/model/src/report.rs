//! Plain-text ranking reports.

use std::fmt;

use peerscan_primitives::{MetricScheme, RankOutcome, RankedResult};

const RULE_WIDTH: usize = 80;

/// Titled ranking, rendered as a fixed-width table.
#[derive(Debug)]
struct Report<'a, M: MetricScheme> {
    title: &'a str,
    outcome: &'a RankOutcome<M>,
}

impl<M: MetricScheme> fmt::Display for Report<'_, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "\n{}", "=".repeat(RULE_WIDTH))?;
        writeln!(f, "{}", self.title)?;
        writeln!(f, "{}", "=".repeat(RULE_WIDTH))?;

        match self.outcome {
            RankOutcome::NoCandidates => writeln!(f, "No other stocks to compare against."),
            RankOutcome::Ranked(result) => write_result(f, result),
        }
    }
}

fn write_result<M: MetricScheme>(
    f: &mut fmt::Formatter<'_>,
    result: &RankedResult<M>,
) -> fmt::Result {
    writeln!(f, "Pool: {} ({} candidates)", result.scope(), result.pool_size())?;
    if !result.degenerate_metrics().is_empty() {
        let names: Vec<String> =
            result.degenerate_metrics().iter().map(ToString::to_string).collect();
        writeln!(f, "Undefined (target is zero): {}", names.join(", "))?;
    }
    writeln!(f, "{}", "-".repeat(RULE_WIDTH))?;

    let per_metric = result.candidates().iter().any(|c| !c.contributions.is_empty());

    write!(f, "{:<4} {:<8} {:<30}", "#", "Code", "Sector")?;
    if per_metric {
        for metric in M::ALL {
            write!(f, " {:>10}", format!("% {}", metric.short_label()))?;
        }
    }
    writeln!(f, " {:>12}", "Score")?;

    for (i, candidate) in result.candidates().iter().enumerate() {
        write!(
            f,
            "{:<4} {:<8} {:<30}",
            i + 1,
            candidate.code.as_str(),
            truncate(candidate.sector.as_str(), 30)
        )?;
        if per_metric {
            for metric in M::ALL {
                match candidate.contribution(*metric) {
                    Some(score) => write!(f, " {score:>10.2}")?,
                    None => write!(f, " {:>10}", "-")?,
                }
            }
        }
        writeln!(f, " {:>12.4}", candidate.score)?;
    }
    Ok(())
}

fn truncate(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// Render a ranking as a fixed-width table.
///
/// Percentage rankings get one column per metric contribution; rankings
/// without contributions show the score only.
#[must_use]
pub fn format_ranking<M: MetricScheme>(title: &str, outcome: &RankOutcome<M>) -> String {
    Report { title, outcome }.to_string()
}

/// Print a ranking to stdout.
pub fn print_ranking<M: MetricScheme>(title: &str, outcome: &RankOutcome<M>) {
    print!("{}", Report { title, outcome });
}
