use wasm_bindgen::prelude::*;
use tinytones_core::{FrameClass, ToneDecoder, ToneEncoder, FRAME_BYTES};

fn frame_class(rate: u32) -> Result<FrameClass, JsValue> {
    FrameClass::from_rate(rate)
        .ok_or_else(|| JsValue::from_str(&format!("Unsupported codec rate {}", rate)))
}

#[wasm_bindgen]
pub struct WasmToneEncoder {
    inner: ToneEncoder,
}

#[wasm_bindgen]
impl WasmToneEncoder {
    /// `rate` is the Codec2 rate, 3200 or 1600
    #[wasm_bindgen(constructor)]
    pub fn new(rate: u32) -> Result<WasmToneEncoder, JsValue> {
        frame_class(rate).map(|class| WasmToneEncoder {
            inner: ToneEncoder::new(class),
        })
    }

    /// Encode a tone frame
    /// Returns the 8 frame bytes as a Uint8Array
    #[wasm_bindgen]
    pub fn encode(&self, index: u8, gain_step: u8) -> Result<Vec<u8>, JsValue> {
        self.inner
            .encode(index, gain_step)
            .map(|frame| frame.to_vec())
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }
}

#[wasm_bindgen]
pub struct WasmToneDecoder {
    inner: ToneDecoder,
}

#[wasm_bindgen]
impl WasmToneDecoder {
    /// `rate` is the Codec2 rate, 3200 or 1600
    #[wasm_bindgen(constructor)]
    pub fn new(rate: u32) -> Result<WasmToneDecoder, JsValue> {
        frame_class(rate).map(|class| WasmToneDecoder {
            inner: ToneDecoder::new(class),
        })
    }

    /// Decode one frame of the stream into an Int16Array of 8 kHz samples.
    /// Errors mean the frame is not a tone and belongs to the speech decoder.
    #[wasm_bindgen]
    pub fn decode(&mut self, frame: &[u8]) -> Result<Vec<i16>, JsValue> {
        let frame: [u8; FRAME_BYTES] = frame
            .try_into()
            .map_err(|_| JsValue::from_str("Tone frames are 8 bytes"))?;
        self.inner
            .decode(&frame)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    #[wasm_bindgen]
    pub fn phase(&self) -> u32 {
        self.inner.phase()
    }

    #[wasm_bindgen]
    pub fn reset(&mut self) {
        self.inner.reset();
    }
}
