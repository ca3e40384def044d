use anyhow::{anyhow, Context, Result};

use bt_metainfo::torrent::{FileMode, TorrentParser};

fn main() -> Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(bt_metainfo::TRACING_LEVEL)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("couldn't set up the tracing subscriber")?;

    let path = std::env::args()
        .nth(1)
        .ok_or_else(|| anyhow!("usage: btmeta <path to .torrent file>"))?;

    let torrent_file = match TorrentParser::parse_file(&path) {
        Ok(torrent_file) => torrent_file,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };

    println!("name:         {}", torrent_file.name);
    println!("announce:     {}", torrent_file.announce);
    println!("info hash:    {}", torrent_file.info_hash.to_hex());
    println!("piece length: {}", torrent_file.piece_length);
    println!("pieces:       {}", torrent_file.piece_count());
    println!("total size:   {}", torrent_file.total_length());

    if let Some(comment) = &torrent_file.comment {
        println!("comment:      {}", comment);
    }
    if let Some(creation_date) = &torrent_file.creation_date {
        println!("created:      {}", creation_date);
    }

    if let FileMode::Multi { files } = &torrent_file.mode {
        println!("files:");
        for file in files {
            println!("  {} ({} bytes)", file.path, file.length);
        }
    }

    Ok(())
}
