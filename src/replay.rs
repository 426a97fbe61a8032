use crate::prelude::*;

use futures::StreamExt;
use tokio::io::AsyncRead;
use tokio_util::codec::FramedRead;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ReplayStats {
    pub frames: u64,
    pub device_messages: u64,
    pub skipped: u64,
    pub failed: u64,
    pub dropped_frames: u64,
}

/// Decodes every frame on `reader` and hands device data to `writer`.
///
/// Messages that fail to decode are logged and skipped; an output failure
/// ends the replay.
pub async fn replay<R>(reader: R, writer: &mut OutputWriter) -> Result<ReplayStats>
where
    R: AsyncRead + Unpin,
{
    let mut stats = ReplayStats::default();
    let mut frames = FramedRead::new(reader, FrameCodec::new());

    while let Some(frame) = frames.next().await {
        let frame = frame?;
        stats.frames += 1;

        match frame.message.decode() {
            Ok(Decoded::Devices(data)) => {
                stats.device_messages += 1;
                writer.write(&data)?;
            }
            Ok(decoded) => {
                debug!("function {:04x}: {}", frame.message.function, serde_json::to_string(&decoded)?);
            }
            Err(err @ DecodeError::TooShort(_)) => {
                warn!("seq {}: {}, dropped", frame.seq, err);
                stats.skipped += 1;
            }
            Err(err) => {
                error!("seq {}: {}", frame.seq, err);
                stats.failed += 1;
            }
        }
    }

    stats.dropped_frames = frames.decoder().dropped() as u64;
    Ok(stats)
}

pub async fn replay_input(input: &str, writer: &mut OutputWriter) -> Result<ReplayStats> {
    if input == "-" {
        info!("Reading from stdin");
        return replay(tokio::io::stdin(), writer).await;
    }

    info!("Reading from {}", input);
    let file = tokio::fs::File::open(input)
        .await
        .map_err(|err| anyhow!("replay.rs:error opening {}: {}", input, err))?;
    replay(file, writer).await
}
