/// One fixed-size slice of a blob, ready to be stored as a chunk document.
pub struct Chunk {
    pub index: u32,
    pub data: Vec<u8>,
}

/// Split blob data into chunks of the given size. The final chunk carries
/// the remainder; empty input yields no chunks.
pub fn split(data: &[u8], chunk_size: usize) -> Vec<Chunk> {
    data.chunks(chunk_size)
        .enumerate()
        .map(|(i, bytes)| Chunk {
            index: i as u32,
            data: bytes.to_vec(),
        })
        .collect()
}
