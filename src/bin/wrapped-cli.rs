use clap::Parser;
use navidrome_wrapped::{save_report, ProgressEvent, Report, Wrapped};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "wrapped-cli")]
#[command(about = "Listening statistics for a Navidrome / Subsonic library", long_about = None)]
struct Cli {
    /// Server URL including http:// or https://
    #[arg(long, env = "NAVIDROME_URL")]
    url: String,

    /// Username
    #[arg(short, long, env = "NAVIDROME_USER")]
    user: String,

    /// Password (can also be set via NAVIDROME_PASSWORD env var)
    #[arg(short, long, env = "NAVIDROME_PASSWORD", hide_env_values = true)]
    password: String,

    /// Albums requested per page
    #[arg(long, default_value_t = 500)]
    page_size: u32,

    /// Pause after each album page, in milliseconds
    #[arg(long, default_value_t = 100)]
    page_delay_ms: u64,

    /// Pause after each album request, in milliseconds
    #[arg(long, default_value_t = 50)]
    album_delay_ms: u64,

    /// Write the report as JSON to this file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print the report as JSON instead of a summary
    #[arg(long)]
    json: bool,

    /// Do not print progress
    #[arg(short, long)]
    quiet: bool,
}

fn print_summary(report: &Report) {
    println!("🎧 Wrapped for {}", report.username);
    println!(
        "   {} songs, {} albums, {} artists",
        report.total_songs, report.total_albums, report.total_artists
    );
    println!(
        "   {} plays, {} listened",
        report.total_plays, report.listening_time_formatted
    );

    if !report.top_artists_by_plays.is_empty() {
        println!("Top artists:");
        for (i, (name, plays)) in report.top_artists_by_plays.iter().enumerate() {
            println!("{:>3}. {} ({} plays)", i + 1, name, plays);
        }
    }

    if !report.top_songs_by_playcount.is_empty() {
        println!("Top songs:");
        for (i, song) in report.top_songs_by_playcount.iter().enumerate() {
            let artists = song
                .artists
                .iter()
                .map(|a| a.name.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            println!("{:>3}. {} - {} ({} plays)", i + 1, artists, song.title, song.plays);
        }
    }

    if !report.top_genres_by_plays.is_empty() {
        println!("Top genres:");
        for (genre, plays) in &report.top_genres_by_plays {
            println!("   - {} ({} plays)", genre, plays);
        }
    }

    println!("Diversity score: {:.1}", report.diversity_score);
    println!(
        "Artist discovery: {}/{} ({:.1}%)",
        report.artist_discovery.listened, report.artist_discovery.total, report.artist_discovery.percentage
    );
    println!(
        "Quality: {} (by plays {}), {}% lossless, {}% hi-res, {} kbps average",
        report.quality.quality_score,
        report.quality.quality_score_by_plays,
        report.quality.percent_lossless,
        report.quality.percent_hi_res,
        report.quality.avg_bitrate
    );

    if let Some(track) = &report.neglected_track {
        println!(
            "Most neglected: {} - {} (last played {})",
            track.artist, track.title, track.played_date
        );
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let mut wrapped = Wrapped::connect(&cli.url, &cli.user, &cli.password).await?;
    wrapped.set_page_size(cli.page_size);
    wrapped.set_pacing(
        Duration::from_millis(cli.page_delay_ms),
        Duration::from_millis(cli.album_delay_ms),
    );

    let quiet = cli.quiet;
    let mut on_progress = |e: &ProgressEvent| {
        if !quiet {
            eprintln!("[{:>3}%] {} ({})", e.percent, e.message, e.phase.as_str());
        }
    };
    let report = wrapped.generate_with_progress(&mut on_progress).await?;

    if report.total_songs == 0 {
        eprintln!("No music data found on your server");
    }

    if let Some(path) = &cli.output {
        save_report(&report, path)?;
    }

    if cli.json {
        println!("{}", report.to_json_pretty()?);
    } else {
        print_summary(&report);
    }

    Ok(())
}
