//! Fixed-size wire framing for the synthesis direction.

/// Splits an encoded PCM buffer into frames of exactly `frame_size` bytes.
///
/// Yields `ceil(len / frame_size)` frames; the final frame is zero-padded
/// to full size. Frame order follows buffer order.
pub fn frame_pcm(buffer: &[u8], frame_size: usize) -> Vec<Vec<u8>> {
    assert!(frame_size > 0, "frame_size must be nonzero");

    let mut frames = Vec::with_capacity(buffer.len().div_ceil(frame_size));
    for chunk in buffer.chunks(frame_size) {
        let mut frame = chunk.to_vec();
        frame.resize(frame_size, 0);
        frames.push(frame);
    }
    frames
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_buffer_yields_no_frames() {
        assert!(frame_pcm(&[], 640).is_empty());
    }

    #[test]
    fn test_exact_multiple() {
        let buffer = vec![7u8; 1280];
        let frames = frame_pcm(&buffer, 640);
        assert_eq!(frames.len(), 2);
        assert!(frames.iter().all(|f| f.len() == 640));
        assert!(frames.iter().all(|f| f.iter().all(|&b| b == 7)));
    }

    #[test]
    fn test_tail_is_zero_padded() {
        let buffer = vec![9u8; 700];
        let frames = frame_pcm(&buffer, 640);
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[1].len(), 640);
        assert!(frames[1][..60].iter().all(|&b| b == 9));
        assert!(frames[1][60..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_frame_count_is_ceiling() {
        for (len, size, expected) in [(0usize, 10usize, 0usize), (1, 10, 1), (10, 10, 1), (11, 10, 2), (99, 10, 10)] {
            let buffer = vec![1u8; len];
            assert_eq!(frame_pcm(&buffer, size).len(), expected, "len={len}");
        }
    }

    #[test]
    fn test_concatenation_preserves_buffer() {
        let buffer: Vec<u8> = (0..=255).cycle().take(1000).collect();
        let frames = frame_pcm(&buffer, 64);

        let rejoined: Vec<u8> = frames.into_iter().flatten().collect();
        assert_eq!(&rejoined[..buffer.len()], &buffer[..]);
        assert!(rejoined[buffer.len()..].iter().all(|&b| b == 0));
    }
}
