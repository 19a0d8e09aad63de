use core::fmt::Debug;

use embedded_sdmmc::{
    BlockDevice, Directory, Error, File, Mode, TimeSource, Timestamp, Volume, VolumeIdx,
    VolumeManager,
};
use heapless::Vec;

use crate::{
    logger::LineSink,
    logic::{
        datetime::DateTime,
        file_name::{first_unused_name, LogFileName},
    },
};

/// Bytes held in RAM before they go to the card, one block's worth
pub const WRITE_BUFFER_LEN: usize = 512;

/// FAT timestamp source for file entries. The clock is read once at boot,
/// all files created or modified in this session get that time.
#[derive(Clone, Copy)]
pub struct BootTime(Timestamp);

impl BootTime {
    pub fn new(time: DateTime) -> Self {
        BootTime(Timestamp {
            // FAT can't store anything before 1980 anyway
            year_since_1970: time.year.saturating_sub(1970).min(u8::MAX as u16) as u8,
            zero_indexed_month: time.month.saturating_sub(1),
            zero_indexed_day: time.day.saturating_sub(1),
            hours: time.hour,
            minutes: time.minute,
            seconds: time.second,
        })
    }
}

impl TimeSource for BootTime {
    fn get_timestamp(&self) -> Timestamp {
        self.0
    }
}

#[derive(Debug)]
pub enum StorageError<E: Debug> {
    Card(Error<E>),
    /// Tried to write before a log file was created
    NoLogFile,
    /// The card took fewer bytes than it was given
    CardFull,
}

impl<E: Debug> From<Error<E>> for StorageError<E> {
    fn from(e: Error<E>) -> Self {
        StorageError::Card(e)
    }
}

/// First FAT volume of an SD card, with at most one open log file.
///
/// Writes collect in a RAM buffer. It goes to the card when it is full and
/// on [`flush`](LineSink::flush), whatever is still buffered is lost on a
/// power cut.
pub struct CardStorage<D, T>
where
    D: BlockDevice,
    T: TimeSource,
{
    volume_mgr: VolumeManager<D, T>,
    volume: Volume,
    root: Directory,
    file: Option<File>,
    buffer: Vec<u8, WRITE_BUFFER_LEN>,
}

impl<D, T> CardStorage<D, T>
where
    D: BlockDevice,
    T: TimeSource,
{
    /// Initialise the card and open the root directory of the first
    /// partition
    pub fn mount(card: D, time_source: T) -> Result<Self, StorageError<D::Error>> {
        // Forces the card through its init sequence
        let blocks = card.num_blocks().map_err(Error::DeviceError)?;
        defmt::debug!("Card has {=u32} blocks", blocks.0);

        let mut volume_mgr = VolumeManager::new(card, time_source);
        let volume = volume_mgr.get_volume(VolumeIdx(0))?;
        let root = volume_mgr.open_root_dir(&volume)?;

        Ok(CardStorage {
            volume_mgr,
            volume,
            root,
            file: None,
            buffer: Vec::new(),
        })
    }

    pub fn exists(&mut self, name: &str) -> Result<bool, StorageError<D::Error>> {
        match self
            .volume_mgr
            .find_directory_entry(&self.volume, &self.root, name)
        {
            Ok(_) => Ok(true),
            Err(Error::FileNotFound) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// Pick the first free `LOGGERnn.CSV` name and create that file.
    ///
    /// `Ok(None)` means all names are in use.
    pub fn create_log(&mut self) -> Result<Option<LogFileName>, StorageError<D::Error>> {
        let name = match first_unused_name(|name| self.exists(name))? {
            Some(name) => name,
            None => return Ok(None),
        };
        let file = self.volume_mgr.open_file_in_dir(
            &mut self.volume,
            &self.root,
            name.as_str(),
            Mode::ReadWriteCreate,
        )?;
        self.file = Some(file);
        self.buffer.clear();
        Ok(Some(name))
    }

    /// Give the card back. Anything not flushed yet is dropped.
    pub fn free(self) -> D {
        self.volume_mgr.free().0
    }

    /// Hand the buffer to the card. The bytes are dropped even if that
    /// fails, so a bad card can't wedge the logger.
    fn write_buffer(&mut self) -> Result<(), StorageError<D::Error>> {
        let file = self.file.as_mut().ok_or(StorageError::NoLogFile)?;
        let result = self.volume_mgr.write(&mut self.volume, file, &self.buffer);
        let pending = self.buffer.len();
        self.buffer.clear();
        if result? < pending {
            return Err(StorageError::CardFull);
        }
        Ok(())
    }
}

impl<D, T> LineSink for CardStorage<D, T>
where
    D: BlockDevice,
    T: TimeSource,
{
    type Error = StorageError<D::Error>;

    fn write_str(&mut self, text: &str) -> Result<(), Self::Error> {
        if self.file.is_none() {
            return Err(StorageError::NoLogFile);
        }
        let mut rest = text.as_bytes();
        while !rest.is_empty() {
            let room = self.buffer.capacity() - self.buffer.len();
            let (now, later) = rest.split_at(room.min(rest.len()));
            // `now` fits, this can't fail
            self.buffer.extend_from_slice(now).ok();
            rest = later;
            if self.buffer.len() == self.buffer.capacity() {
                self.write_buffer()?;
            }
        }
        Ok(())
    }

    /// The driver writes data blocks and the directory entry straight
    /// through, so getting the buffer onto the card is all there is to it.
    fn flush(&mut self) -> Result<(), Self::Error> {
        if self.file.is_none() {
            return Err(StorageError::NoLogFile);
        }
        if self.buffer.is_empty() {
            return Ok(());
        }
        self.write_buffer()
    }
}
