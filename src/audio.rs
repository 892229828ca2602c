use std::thread;

#[cfg(feature = "playback")]
pub use rodio_backend::PlaybackError;

/// Plays downloaded media on its own thread so the window keeps repainting.
pub fn play_in_background(label: String, bytes: Vec<u8>) {
    let spawned = thread::Builder::new()
        .name("media-playback".to_string())
        .spawn(move || {
            log::info!("Playing {label} ({} bytes)", bytes.len());
            if let Err(err) = play_blocking(&label, bytes) {
                log::error!("Playback of {label} failed: {err}");
            }
        });

    if let Err(err) = spawned {
        log::error!("Failed to spawn playback thread: {err}");
    }
}

#[cfg(feature = "playback")]
fn play_blocking(_label: &str, bytes: Vec<u8>) -> Result<(), PlaybackError> {
    rodio_backend::play(bytes)
}

#[cfg(not(feature = "playback"))]
fn play_blocking(label: &str, bytes: Vec<u8>) -> std::io::Result<()> {
    let name = crate::network::media_file_name(label).unwrap_or("media.bin");
    let path = std::env::temp_dir().join(name);
    std::fs::write(&path, bytes)?;
    log::warn!(
        "Built without audio playback; saved {label} to {}",
        path.display()
    );
    Ok(())
}

#[cfg(feature = "playback")]
mod rodio_backend {
    use std::io::Cursor;

    use rodio::decoder::DecoderError;
    use rodio::{Decoder, OutputStream, PlayError, Sink, StreamError};
    use thiserror::Error;

    #[derive(Debug, Error)]
    pub enum PlaybackError {
        #[error("no audio output device: {0}")]
        Device(#[from] StreamError),
        #[error("cannot start playback: {0}")]
        Sink(#[from] PlayError),
        #[error("unsupported audio data: {0}")]
        Decode(#[from] DecoderError),
    }

    pub fn play(bytes: Vec<u8>) -> Result<(), PlaybackError> {
        // The stream must outlive the sink or playback stops immediately.
        let (_stream, handle) = OutputStream::try_default()?;
        let sink = Sink::try_new(&handle)?;
        sink.append(Decoder::new(Cursor::new(bytes))?);
        sink.sleep_until_end();
        Ok(())
    }
}
