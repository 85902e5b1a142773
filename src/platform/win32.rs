//! GDI backend: `GetClientRect` for the extent, `GetDC`/`ReleaseDC` for the
//! draw context and `StretchDIBits` for the blit.

use std::ffi::c_void;
use std::mem::size_of;

use windows::Win32::Foundation::{HINSTANCE, HWND, RECT};
use windows::Win32::Graphics::Gdi::{
    GetDC, ReleaseDC, SetStretchBltMode, StretchDIBits, BITMAPINFO, BITMAPINFOHEADER, BI_RGB,
    DIB_RGB_COLORS, HDC, RGBQUAD, SRCCOPY, STRETCH_DELETESCANS,
};
use windows::Win32::UI::WindowsAndMessaging::{GetClientRect, IsWindow};

use crate::core::dib::{try_vec, Blit, DibCompression, DibDescriptor, StretchMode, COLOR_TABLE_LEN};
use crate::core::probe::extent_from_edges;
use crate::error::{Result, SurfaceError};
use crate::traits::NativeWindow;
use crate::types::Extent2D;

/// Module instance that owns the window class
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Win32Instance(pub HINSTANCE);

impl Win32Instance {
    pub fn from_raw(hinstance: isize) -> Self {
        Self(HINSTANCE(hinstance as *mut c_void))
    }
}

/// Target window. Every call checks the handle with `IsWindow` first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Win32Window {
    hwnd: HWND,
}

impl Win32Window {
    pub fn new(hwnd: HWND) -> Self {
        Self { hwnd }
    }

    pub fn from_raw(hwnd: isize) -> Self {
        Self::new(HWND(hwnd as *mut c_void))
    }

    pub fn hwnd(&self) -> HWND {
        self.hwnd
    }

    fn ensure_valid(&self) -> Result<()> {
        // SAFETY: IsWindow accepts any value, including stale handles.
        if unsafe { IsWindow(self.hwnd) }.as_bool() {
            Ok(())
        } else {
            Err(SurfaceError::InvalidHandle)
        }
    }
}

/// Window DC; released with `ReleaseDC` on drop
#[derive(Debug)]
pub struct Win32DrawContext {
    hwnd: HWND,
    hdc: HDC,
}

impl Drop for Win32DrawContext {
    fn drop(&mut self) {
        // SAFETY: hdc came from GetDC(hwnd) and is released exactly once here.
        if unsafe { ReleaseDC(self.hwnd, self.hdc) } == 0 {
            log::warn!("ReleaseDC failed for window {:?}", self.hwnd);
        }
    }
}

/// BITMAPINFO with a full 256-entry color table
#[repr(C)]
#[derive(Clone, Copy)]
struct BitmapInfo256 {
    header: BITMAPINFOHEADER,
    colors: [RGBQUAD; COLOR_TABLE_LEN],
}

/// Heap block holding the native bitmap header; freed on drop
pub struct Win32Header {
    // Exactly one element. A Vec rather than a Box so the block is reserved
    // through try_reserve_exact and an allocation failure is reported.
    block: Vec<BitmapInfo256>,
}

impl Win32Header {
    fn info(&self) -> &BitmapInfo256 {
        &self.block[0]
    }
}

impl std::fmt::Debug for Win32Header {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let header = &self.info().header;
        f.debug_struct("Win32Header")
            .field("width", &header.biWidth)
            .field("height", &header.biHeight)
            .field("bit_count", &header.biBitCount)
            .finish()
    }
}

fn to_i32(value: u32, what: &str) -> Result<i32> {
    i32::try_from(value).map_err(|_| SurfaceError::presentation(format!("{what} {value} out of range")))
}

impl NativeWindow for Win32Window {
    type Instance = Win32Instance;
    type DrawContext = Win32DrawContext;
    type Header = Win32Header;

    fn client_extent(&self) -> Result<Extent2D> {
        self.ensure_valid()?;
        let mut rect = RECT::default();
        // SAFETY: hwnd was checked above and rect is a valid out pointer.
        unsafe { GetClientRect(self.hwnd, &mut rect) }.map_err(|_| SurfaceError::InvalidHandle)?;
        Ok(extent_from_edges(rect.left, rect.top, rect.right, rect.bottom))
    }

    fn acquire_draw_context(&self) -> Result<Win32DrawContext> {
        self.ensure_valid()?;
        // SAFETY: hwnd was checked above; the DC is owned by the returned guard.
        let hdc = unsafe { GetDC(self.hwnd) };
        if hdc.is_invalid() {
            return Err(SurfaceError::allocation("GetDC returned a null device context"));
        }
        Ok(Win32DrawContext {
            hwnd: self.hwnd,
            hdc,
        })
    }

    fn create_header(&self, descriptor: &DibDescriptor) -> Result<Win32Header> {
        let compression = match descriptor.compression {
            DibCompression::Rgb => BI_RGB.0,
        };

        let mut colors = [RGBQUAD::default(); COLOR_TABLE_LEN];
        for (dst, src) in colors.iter_mut().zip(&descriptor.color_table) {
            *dst = RGBQUAD {
                rgbBlue: src.blue,
                rgbGreen: src.green,
                rgbRed: src.red,
                rgbReserved: src.reserved,
            };
        }

        let mut block = try_vec(1)?;
        block.push(BitmapInfo256 {
            header: BITMAPINFOHEADER {
                biSize: size_of::<BITMAPINFOHEADER>() as u32,
                biWidth: descriptor.width,
                biHeight: descriptor.height,
                biPlanes: descriptor.planes,
                biBitCount: descriptor.bit_count,
                biCompression: compression,
                ..Default::default()
            },
            colors,
        });
        Ok(Win32Header { block })
    }

    fn stretch_blit(
        &self,
        context: &mut Win32DrawContext,
        header: &Win32Header,
        blit: &Blit<'_>,
    ) -> Result<()> {
        self.ensure_valid()?;

        // The header describes the window-sized buffer; when the image memory
        // is laid out differently, describe the memory instead.
        let mut info = *header.info();
        let memory_width = to_i32(blit.memory_extent.width, "image row width")?;
        let memory_height = to_i32(blit.memory_extent.height, "image height")?;
        info.header.biWidth = memory_width;
        info.header.biHeight = if header.info().header.biHeight < 0 {
            -memory_height
        } else {
            memory_height
        };

        let mode = match blit.mode {
            StretchMode::DeleteScans => STRETCH_DELETESCANS,
        };
        // SAFETY: the DC is live for as long as `context` is.
        if unsafe { SetStretchBltMode(context.hdc, mode) } == 0 {
            return Err(SurfaceError::presentation("SetStretchBltMode failed"));
        }

        let dst = blit.destination;
        let src = blit.source;
        // SAFETY: `pixels` holds row_pitch * height bytes (checked by
        // Blit::from_image) and `info` matches that layout.
        let lines = unsafe {
            StretchDIBits(
                context.hdc,
                to_i32(dst.x, "destination x")?,
                to_i32(dst.y, "destination y")?,
                to_i32(dst.width, "destination width")?,
                to_i32(dst.height, "destination height")?,
                to_i32(src.x, "source x")?,
                to_i32(src.y, "source y")?,
                to_i32(src.width, "source width")?,
                to_i32(src.height, "source height")?,
                Some(blit.pixels.as_ptr().cast::<c_void>()),
                (&info as *const BitmapInfo256).cast::<BITMAPINFO>(),
                DIB_RGB_COLORS,
                SRCCOPY,
            )
        };
        if lines == 0 {
            return Err(SurfaceError::presentation("StretchDIBits copied no scan lines"));
        }
        Ok(())
    }
}
